//! Combat result types.

use crate::state::{EntityId, PlayerSlot};

/// Why a hit had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IgnoreReason {
    /// The projectile belongs to the victim.
    OwnProjectile,
    /// The projectile belongs to the teammate and friendly fire is off.
    FriendlyFireDisabled,
    /// Enemy or boss projectile hitting an enemy or the boss.
    HostileToHostile,
    /// The victim was hit less than the invincibility window ago.
    Invincible,
    /// No such target, or its sprite is gone.
    TargetMissing,
    /// The target is already dead; the defeat branch runs once.
    AlreadyDefeated,
}

/// What soaked up a hit before health was touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Absorption {
    /// Shield consumed by this hit.
    Shield,
    /// Debug invincibility; absorbs indefinitely.
    Debug,
}

/// Who was hit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitTarget {
    Player(PlayerSlot),
    Enemy(EntityId),
    /// Boss of the given level.
    Boss(u32),
}

/// Score and coins credited to the local player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub score: u64,
    pub coins: u32,
}

impl Reward {
    pub const NONE: Reward = Reward { score: 0, coins: 0 };
}

/// Result of one projectile hit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    Ignored(IgnoreReason),
    Absorbed(Absorption),
    /// Health was reduced but stays above zero.
    Damaged { target: HitTarget, remaining: i32 },
    /// Health reached zero; the defeat branch ran.
    Defeated { target: HitTarget, reward: Reward },
}

impl HitOutcome {
    /// True when the hit changed the target's health.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Damaged { .. } | Self::Defeated { .. })
    }

    pub fn is_defeat(&self) -> bool {
        matches!(self, Self::Defeated { .. })
    }
}
