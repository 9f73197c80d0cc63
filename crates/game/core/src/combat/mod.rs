//! Combat and collision arbitration.
//!
//! Every entry point takes the scene by mutable reference and reports what
//! happened through a [`HitOutcome`]. None of them fail: a hit on a missing
//! target, a hit inside the invincibility window or a hit from the victim's
//! own projectile is simply ignored with a reason.
//!
//! # Order of checks
//!
//! ```text
//! ownership guard → target exists / not already defeated → invincibility window
//!   → debug or shield absorption (players only) → damage → one-shot defeat
//! ```
//!
//! # Core Functions
//!
//! - `on_projectile_hit_player` / `on_projectile_hit_enemy` / `on_projectile_hit_boss`
//! - `apply_damage`: health reduction (clamped to 0)
//! - `collect_coin` / `collect_power_up`: local pickups, announced to the peer
//! - `respawn_player`: revives a defeated player who still has lives

pub mod damage;
pub mod hit;
pub mod pickup;
pub mod result;

pub use damage::{apply_damage, is_invincible};
pub use hit::{
    Owner, Projectile, on_projectile_hit_boss, on_projectile_hit_enemy, on_projectile_hit_player,
    respawn_player, start_boss,
};
pub use pickup::{PickupOutcome, collect_coin, collect_power_up};
pub use result::{Absorption, HitOutcome, HitTarget, IgnoreReason, Reward};
