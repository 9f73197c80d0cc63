//! Event payloads published by the sync worker.

use serde::{Deserialize, Serialize};

use jumpjump_core::{
    Correction, EntityId, EntityKind, HitOutcome, PlayerSlot, PowerUpKind, Reward, SkipReason,
};

use super::bus::Topic;

/// Why an entity left the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Collected locally or by the remote peer.
    Collected,
    /// Omitted from a full sync.
    GarbageCollected,
    /// Death linger ran out.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// A record was registered; `adopted` when a local sprite was reused.
    EntitySpawned {
        kind: EntityKind,
        id: EntityId,
        adopted: bool,
    },
    /// A sprite was moved toward its authoritative position.
    EntityCorrected {
        kind: EntityKind,
        id: EntityId,
        correction: Correction,
    },
    EnemyDied {
        id: EntityId,
    },
    EntityRemoved {
        kind: EntityKind,
        id: EntityId,
        reason: RemovalReason,
    },
    /// An inbound payload had no effect.
    MessageSkipped {
        kind: EntityKind,
        id: EntityId,
        reason: SkipReason,
    },
    /// An inbound message could not be decoded and was dropped.
    DecodeFailed {
        error: String,
    },
    FullSyncApplied {
        entries: usize,
        collected: usize,
    },
    /// The host broadcast a full-sync snapshot.
    SnapshotSent {
        enemies: usize,
        coins: usize,
    },
    Hit {
        outcome: HitOutcome,
    },
    BossStarted {
        level: u32,
    },
    PlayerRespawned {
        slot: PlayerSlot,
        lives: u32,
    },
    BossDefeated {
        level: u32,
        reward: Reward,
    },
    CoinCollected {
        id: EntityId,
        value: u32,
    },
    PowerUpCollected {
        id: EntityId,
        kind: PowerUpKind,
        slot: PlayerSlot,
    },
    /// The high score was raised and persisted.
    HighScore {
        score: u64,
    },
}

impl SyncEvent {
    pub fn topic(&self) -> Topic {
        match self {
            SyncEvent::EntitySpawned { .. }
            | SyncEvent::EntityCorrected { .. }
            | SyncEvent::EnemyDied { .. }
            | SyncEvent::EntityRemoved { .. }
            | SyncEvent::MessageSkipped { .. }
            | SyncEvent::DecodeFailed { .. }
            | SyncEvent::FullSyncApplied { .. }
            | SyncEvent::SnapshotSent { .. } => Topic::Entities,
            SyncEvent::Hit { .. }
            | SyncEvent::BossStarted { .. }
            | SyncEvent::BossDefeated { .. }
            | SyncEvent::PlayerRespawned { .. } => Topic::Combat,
            SyncEvent::CoinCollected { .. }
            | SyncEvent::PowerUpCollected { .. }
            | SyncEvent::HighScore { .. } => Topic::Progress,
        }
    }
}
