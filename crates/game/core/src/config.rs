//! Tunable parameters of the co-op sync layer.
//!
//! The snap threshold, interpolation factor, invincibility window and
//! friendly-fire switch are empirical tuning values, so they live here instead
//! of being hardcoded in the reconciliation and combat code.

use crate::error::{ErrorSeverity, GameError};

/// Score and coin payouts for defeats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTable {
    pub enemy_score: u64,
    /// Value of the coin an enemy drops when defeated.
    pub enemy_drop_value: u32,
    pub boss_score: u64,
    pub boss_coins: u32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            enemy_score: 100,
            enemy_drop_value: 1,
            boss_score: 1000,
            boss_coins: 10,
        }
    }
}

/// Sync and combat configuration shared by both peers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncConfig {
    /// Distance in pixels above which a correction snaps instead of blending.
    pub snap_threshold: f32,
    /// Fraction of the remaining distance covered by one blended correction.
    /// Must lie strictly between 0 and 1.
    pub lerp_factor: f32,
    /// Milliseconds after a hit during which further hits on the victim are ignored.
    pub invincibility_ms: u64,
    /// Milliseconds a dead enemy stays in the scene (tinted) before removal.
    pub death_linger_ms: u64,
    /// Whether a player's projectiles may damage the teammate.
    pub friendly_fire: bool,
    /// Debug switch: players never take damage.
    pub debug_invincible: bool,
    /// Downward acceleration for gravity bodies, pixels per second squared.
    pub gravity: f32,
    /// Y coordinate gravity bodies come to rest on.
    pub ground_y: f32,
    pub rewards: RewardTable,
}

impl SyncConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SNAP_THRESHOLD: f32 = 50.0;
    pub const DEFAULT_LERP_FACTOR: f32 = 0.3;
    pub const DEFAULT_INVINCIBILITY_MS: u64 = 500;
    pub const DEFAULT_DEATH_LINGER_MS: u64 = 600;
    pub const DEFAULT_GRAVITY: f32 = 900.0;
    pub const DEFAULT_GROUND_Y: f32 = 560.0;

    pub fn new() -> Self {
        Self {
            snap_threshold: Self::DEFAULT_SNAP_THRESHOLD,
            lerp_factor: Self::DEFAULT_LERP_FACTOR,
            invincibility_ms: Self::DEFAULT_INVINCIBILITY_MS,
            death_linger_ms: Self::DEFAULT_DEATH_LINGER_MS,
            friendly_fire: false,
            debug_invincible: false,
            gravity: Self::DEFAULT_GRAVITY,
            ground_y: Self::DEFAULT_GROUND_Y,
            rewards: RewardTable::default(),
        }
    }

    pub fn with_friendly_fire(mut self, enabled: bool) -> Self {
        self.friendly_fire = enabled;
        self
    }

    pub fn with_snap_threshold(mut self, threshold: f32) -> Self {
        self.snap_threshold = threshold;
        self
    }

    pub fn with_lerp_factor(mut self, factor: f32) -> Self {
        self.lerp_factor = factor;
        self
    }

    /// Checks the parameters the reconciliation math depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.snap_threshold.is_finite() && self.snap_threshold > 0.0) {
            return Err(ConfigError::SnapThreshold(self.snap_threshold));
        }
        if !(self.lerp_factor > 0.0 && self.lerp_factor < 1.0) {
            return Err(ConfigError::LerpFactor(self.lerp_factor));
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(ConfigError::Gravity(self.gravity));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("snap threshold must be a positive distance (got {0})")]
    SnapThreshold(f32),

    #[error("interpolation factor must lie strictly between 0 and 1 (got {0})")]
    LerpFactor(f32),

    #[error("gravity must be finite and non-negative (got {0})")]
    Gravity(f32),
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SnapThreshold(_) => "CONFIG_SNAP_THRESHOLD",
            Self::LerpFactor(_) => "CONFIG_LERP_FACTOR",
            Self::Gravity(_) => "CONFIG_GRAVITY",
        }
    }
}
