//! Closed sets of entity kinds and the wire tags that select them.
//!
//! The network payloads carry free-form `type` strings. They are parsed once,
//! at the reconciliation boundary, into these enums; every place that chooses a
//! texture or a behaviour matches on the enum exhaustively.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Registry a tracked entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Enemy,
    Coin,
    PowerUp,
}

/// Enemy species.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyKind {
    #[default]
    Slime,
    Bat,
    Spider,
    Skeleton,
    Ghost,
}

impl EnemyKind {
    /// Parses a wire tag. Unknown or missing tags fall back to the default species.
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    /// Health a freshly spawned enemy of this species starts with.
    pub const fn base_health(self) -> i32 {
        match self {
            EnemyKind::Slime => 20,
            EnemyKind::Bat => 10,
            EnemyKind::Spider => 15,
            EnemyKind::Skeleton => 30,
            EnemyKind::Ghost => 25,
        }
    }

    /// Whether the species ignores gravity.
    pub const fn flies(self) -> bool {
        matches!(self, EnemyKind::Bat | EnemyKind::Ghost)
    }
}

/// Power-up effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PowerUpKind {
    #[default]
    Shield,
    ExtraLife,
    SpeedBoost,
    DoubleJump,
    RapidFire,
}

impl PowerUpKind {
    /// Parses a wire tag. Unknown tags fall back to the default effect.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

/// Texture a sprite is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpriteTexture {
    Enemy(EnemyKind),
    Coin,
    DropCoin,
    PowerUp(PowerUpKind),
}

impl SpriteTexture {
    /// Asset key understood by the renderer.
    pub const fn asset_key(self) -> &'static str {
        match self {
            SpriteTexture::Enemy(kind) => match kind {
                EnemyKind::Slime => "enemy_slime",
                EnemyKind::Bat => "enemy_bat",
                EnemyKind::Spider => "enemy_spider",
                EnemyKind::Skeleton => "enemy_skeleton",
                EnemyKind::Ghost => "enemy_ghost",
            },
            SpriteTexture::Coin => "coin",
            SpriteTexture::DropCoin => "coin_small",
            SpriteTexture::PowerUp(kind) => match kind {
                PowerUpKind::Shield => "powerup_shield",
                PowerUpKind::ExtraLife => "powerup_life",
                PowerUpKind::SpeedBoost => "powerup_speed",
                PowerUpKind::DoubleJump => "powerup_jump",
                PowerUpKind::RapidFire => "powerup_rapid",
            },
        }
    }

    pub const fn entity_kind(self) -> EntityKind {
        match self {
            SpriteTexture::Enemy(_) => EntityKind::Enemy,
            SpriteTexture::Coin | SpriteTexture::DropCoin => EntityKind::Coin,
            SpriteTexture::PowerUp(_) => EntityKind::PowerUp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_fall_back_to_defaults() {
        assert_eq!(EnemyKind::from_tag(Some("bat")), EnemyKind::Bat);
        assert_eq!(EnemyKind::from_tag(Some("Skeleton")), EnemyKind::Skeleton);
        assert_eq!(EnemyKind::from_tag(Some("dragon")), EnemyKind::Slime);
        assert_eq!(EnemyKind::from_tag(None), EnemyKind::Slime);
        assert_eq!(PowerUpKind::from_tag("extra_life"), PowerUpKind::ExtraLife);
        assert_eq!(PowerUpKind::from_tag("???"), PowerUpKind::Shield);
    }

    #[test]
    fn textures_map_back_to_their_registry() {
        assert_eq!(
            SpriteTexture::Enemy(EnemyKind::Ghost).entity_kind(),
            EntityKind::Enemy
        );
        assert_eq!(SpriteTexture::DropCoin.entity_kind(), EntityKind::Coin);
        assert_eq!(SpriteTexture::Coin.asset_key(), "coin");
    }
}
