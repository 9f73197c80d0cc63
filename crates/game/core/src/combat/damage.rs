//! Damage application and the invincibility window.

use crate::state::Timestamp;

/// Apply damage to current health.
///
/// Negative damage is treated as zero, so a hit never heals.
///
/// # Returns
///
/// New health value (clamped to 0)
pub fn apply_damage(health: i32, damage: i32) -> i32 {
    health.saturating_sub(damage.max(0)).max(0)
}

/// Whether a victim last hit at `last_hit` still ignores damage at `now`.
///
/// # Formula
///
/// ```text
/// invincible = now - last_hit < window_ms
/// ```
pub fn is_invincible(last_hit: Option<Timestamp>, now: Timestamp, window_ms: u64) -> bool {
    last_hit.is_some_and(|at| now.since(at) < window_ms)
}
