//! Typed records for the network-tracked entity kinds.
//!
//! Each record owns exactly one sprite in the scene's [`SpriteStore`] and
//! mirrors the last authoritative state received for its identifier.
//!
//! [`SpriteStore`]: super::SpriteStore

use super::{
    EnemyKind, EntityId, EntityKind, PowerUpKind, Position, SpriteKey, Timestamp, Velocity,
};

/// Shared surface of the per-kind records stored in a [`Registry`].
///
/// [`Registry`]: crate::state::Registry
pub trait TrackedRecord {
    const KIND: EntityKind;

    fn id(&self) -> &EntityId;

    fn sprite(&self) -> SpriteKey;
}

/// Enemy tracked by identifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyRecord {
    pub id: EntityId,
    pub sprite: SpriteKey,
    pub kind: EnemyKind,
    pub position: Position,
    pub velocity: Velocity,
    /// Never negative.
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    /// Set once when the enemy dies; removal happens after the death linger.
    pub died_at: Option<Timestamp>,
    /// Start of the current invincibility window.
    pub last_hit_at: Option<Timestamp>,
    /// Last authoritative position a correction was applied for.
    pub synced_position: Option<Position>,
}

impl EnemyRecord {
    pub fn new(id: EntityId, sprite: SpriteKey, kind: EnemyKind, position: Position) -> Self {
        let health = kind.base_health();
        Self {
            id,
            sprite,
            kind,
            position,
            velocity: Velocity::ZERO,
            health,
            max_health: health,
            alive: true,
            died_at: None,
            last_hit_at: None,
            synced_position: None,
        }
    }

    pub fn with_health(mut self, health: i32, max_health: i32) -> Self {
        self.health = health.max(0);
        self.max_health = max_health.max(self.health);
        self
    }

    /// True while dead but still waiting for its removal.
    pub fn is_dying(&self) -> bool {
        !self.alive && self.died_at.is_some()
    }
}

impl TrackedRecord for EnemyRecord {
    const KIND: EntityKind = EntityKind::Enemy;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn sprite(&self) -> SpriteKey {
        self.sprite
    }
}

/// Coin tracked by identifier (level coins and enemy drops).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoinRecord {
    pub id: EntityId,
    pub sprite: SpriteKey,
    pub position: Position,
    pub velocity: Velocity,
    pub value: u32,
    pub collected: bool,
    pub synced_position: Option<Position>,
}

impl CoinRecord {
    pub const DEFAULT_VALUE: u32 = 1;

    pub fn new(id: EntityId, sprite: SpriteKey, position: Position, value: u32) -> Self {
        Self {
            id,
            sprite,
            position,
            velocity: Velocity::ZERO,
            value,
            collected: false,
            synced_position: None,
        }
    }
}

impl TrackedRecord for CoinRecord {
    const KIND: EntityKind = EntityKind::Coin;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn sprite(&self) -> SpriteKey {
        self.sprite
    }
}

/// Power-up tracked by identifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerUpRecord {
    pub id: EntityId,
    pub sprite: SpriteKey,
    pub kind: PowerUpKind,
    pub position: Position,
    pub collected: bool,
    pub synced_position: Option<Position>,
}

impl PowerUpRecord {
    pub fn new(id: EntityId, sprite: SpriteKey, kind: PowerUpKind, position: Position) -> Self {
        Self {
            id,
            sprite,
            kind,
            position,
            collected: false,
            synced_position: None,
        }
    }
}

impl TrackedRecord for PowerUpRecord {
    const KIND: EntityKind = EntityKind::PowerUp;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn sprite(&self) -> SpriteKey {
        self.sprite
    }
}
