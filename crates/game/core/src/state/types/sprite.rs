use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;

use super::{EntityId, EntityKind, Position, SpriteTexture, Velocity};

/// Handle to a scene-owned sprite. Keys are never reused within a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpriteKey(pub u32);

impl fmt::Display for SpriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

bitflags! {
    /// Render and physics switches of a sprite.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpriteFlags: u8 {
        const VISIBLE = 1 << 0;
        const ACTIVE = 1 << 1;
        /// Body is pulled down by gravity every frame.
        const GRAVITY = 1 << 2;
    }
}

/// Colour overlay applied to a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tint {
    /// Red overlay shown while an enemy plays its death animation.
    Death,
}

/// Local render/physics object.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sprite {
    pub key: SpriteKey,
    pub texture: SpriteTexture,
    pub position: Position,
    pub velocity: Velocity,
    pub flags: SpriteFlags,
    pub tint: Option<Tint>,
    /// Network identifier this sprite stands for, if any.
    pub tag: Option<EntityId>,
}

impl Sprite {
    pub fn kind(&self) -> EntityKind {
        self.texture.entity_kind()
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(SpriteFlags::ACTIVE)
    }

    /// Makes the sprite visible, active, and tagged with `id`.
    pub fn bind(&mut self, id: &EntityId) {
        self.flags.insert(SpriteFlags::VISIBLE | SpriteFlags::ACTIVE);
        self.tag = Some(id.clone());
    }
}

/// Every sprite owned by the scene, grouped implicitly by entity kind.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpriteStore {
    next_key: u32,
    sprites: BTreeMap<SpriteKey, Sprite>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a visible, active sprite and returns its key.
    pub fn create(
        &mut self,
        texture: SpriteTexture,
        position: Position,
        tag: Option<EntityId>,
    ) -> SpriteKey {
        let key = SpriteKey(self.next_key);
        self.next_key += 1;

        let mut flags = SpriteFlags::VISIBLE | SpriteFlags::ACTIVE;
        if matches!(texture, SpriteTexture::DropCoin) {
            flags.insert(SpriteFlags::GRAVITY);
        }

        self.sprites.insert(
            key,
            Sprite {
                key,
                texture,
                position,
                velocity: Velocity::ZERO,
                flags,
                tint: None,
                tag,
            },
        );
        key
    }

    pub fn get(&self, key: SpriteKey) -> Option<&Sprite> {
        self.sprites.get(&key)
    }

    pub fn get_mut(&mut self, key: SpriteKey) -> Option<&mut Sprite> {
        self.sprites.get_mut(&key)
    }

    /// Destroys a sprite. Returns the removed sprite if it was still alive.
    pub fn destroy(&mut self, key: SpriteKey) -> Option<Sprite> {
        self.sprites.remove(&key)
    }

    /// True when the sprite exists and is active.
    pub fn is_live(&self, key: SpriteKey) -> bool {
        self.sprites.get(&key).is_some_and(Sprite::is_active)
    }

    /// Iterates the sprite group of one entity kind.
    pub fn group(&self, kind: EntityKind) -> impl Iterator<Item = &Sprite> {
        self.sprites.values().filter(move |s| s.kind() == kind)
    }

    pub fn group_mut(&mut self, kind: EntityKind) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.values_mut().filter(move |s| s.kind() == kind)
    }

    /// Scans a kind's group for a sprite tagged with `id`.
    pub fn find_tagged(&self, kind: EntityKind, id: &EntityId) -> Option<SpriteKey> {
        self.group(kind)
            .find(|s| s.tag.as_ref() == Some(id))
            .map(|s| s.key)
    }

    /// Number of sprites in a kind's group carrying `id`.
    pub fn count_tagged(&self, kind: EntityKind, id: &EntityId) -> usize {
        self.group(kind)
            .filter(|s| s.tag.as_ref() == Some(id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.values_mut()
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}
