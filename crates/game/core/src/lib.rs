//! Deterministic co-op entity synchronization shared by both peers.
//!
//! `jumpjump-core` owns the scene model (sprites, per-kind registries, seeded
//! RNG, authority flag) and every rule that mutates it: spawn authority,
//! incremental reconciliation, the periodic full sync, and combat
//! arbitration. It performs no I/O; inbound messages flow through
//! [`engine::SyncEngine`] and outbound messages collect in the scene outbox
//! for the runtime to forward.
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod reconcile;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod sync;

pub use combat::{
    Absorption, HitOutcome, HitTarget, IgnoreReason, Owner, PickupOutcome, Projectile, Reward,
    collect_coin, collect_power_up, on_projectile_hit_boss, on_projectile_hit_enemy,
    on_projectile_hit_player, respawn_player, start_boss,
};
pub use config::{ConfigError, RewardTable, SyncConfig};
pub use engine::{ApplyOutcome, FrameReport, SyncEngine};
pub use error::{ErrorSeverity, GameError};
pub use protocol::{CoinState, EnemyState, NetMessage, PowerUpState};
pub use reconcile::{
    Correction, ReconcileOutcome, SkipReason, Transition, apply_coin_state, apply_enemy_state,
    apply_power_up_state,
};
pub use rng::{SeededRng, seeded_between, seeded_random};
pub use spawn::{
    LevelBounds, SpawnError, SpawnOutcome, SpawnRequest, SpawnSpec, populate_level, try_spawn,
};
pub use state::{
    Authority, BossState, CoinRecord, EnemyKind, EnemyRecord, EntityId, EntityKind, PlayerSlot,
    PlayerState, Position, PowerUpKind, PowerUpRecord, Registry, SceneState, Sprite, SpriteFlags,
    SpriteKey, SpriteStore, SpriteTexture, Timestamp, Tint, Velocity,
};
pub use sync::{SyncReport, handle_entities_sync, snapshot_entities};
