//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! delivering network messages, ticking frames, and streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use jumpjump_core::{
    ApplyOutcome, EntityId, FrameReport, HitOutcome, HitTarget, LevelBounds, NetMessage,
    PickupOutcome, PlayerSlot, Position, Projectile, SceneState, SpawnOutcome, SpawnRequest,
    Timestamp,
};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, SyncEvent, Topic};
use crate::workers::{Command, Pickup};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Apply one inbound message from the remote peer.
    pub async fn deliver(&self, message: NetMessage) -> Result<ApplyOutcome> {
        self.request(|reply| Command::Deliver { message, reply })
            .await
    }

    /// Decode and apply one raw JSON message.
    ///
    /// A message that fails to decode is dropped: a `DecodeFailed` event is
    /// published and [`RuntimeError::Decode`] returned; the scene is untouched.
    pub async fn deliver_json(&self, raw: &str) -> Result<ApplyOutcome> {
        match serde_json::from_str::<NetMessage>(raw) {
            Ok(message) => self.deliver(message).await,
            Err(e) => {
                tracing::warn!("Dropping malformed network message: {}", e);
                self.event_bus.publish(SyncEvent::DecodeFailed {
                    error: e.to_string(),
                });
                Err(RuntimeError::Decode(e))
            }
        }
    }

    /// Run one frame at scene time `now`.
    pub async fn advance(&self, now: Timestamp) -> Result<FrameReport> {
        self.request(|reply| Command::Advance { now, reply }).await
    }

    /// Spawn an entity through the authority rules.
    pub async fn spawn(&self, request: SpawnRequest) -> Result<SpawnOutcome> {
        self.request(|reply| Command::Spawn { request, reply })
            .await?
    }

    /// Create the seeded enemies and coins of a level. Returns their ids.
    pub async fn populate_level(
        &self,
        enemies: u32,
        coins: u32,
        bounds: LevelBounds,
    ) -> Result<Vec<EntityId>> {
        self.request(|reply| Command::PopulateLevel {
            enemies,
            coins,
            bounds,
            reply,
        })
        .await
    }

    /// Resolve a local projectile collision.
    pub async fn projectile_hit(
        &self,
        projectile: Projectile,
        target: HitTarget,
    ) -> Result<HitOutcome> {
        self.request(|reply| Command::ProjectileHit {
            projectile,
            target,
            reply,
        })
        .await
    }

    pub async fn collect_coin(&self, id: EntityId) -> Result<PickupOutcome> {
        self.request(|reply| Command::Collect {
            pickup: Pickup::Coin(id),
            reply,
        })
        .await
    }

    pub async fn collect_power_up(&self, slot: PlayerSlot, id: EntityId) -> Result<PickupOutcome> {
        self.request(|reply| Command::Collect {
            pickup: Pickup::PowerUp { id, slot },
            reply,
        })
        .await
    }

    /// Start the boss encounter of `level`.
    pub async fn start_boss(&self, level: u32, position: Position, health: i32) -> Result<()> {
        self.request(|reply| Command::StartBoss {
            level,
            position,
            health,
            reply,
        })
        .await
    }

    /// Revive a defeated player. Returns `false` when the player is still
    /// alive or out of lives.
    pub async fn respawn(&self, slot: PlayerSlot) -> Result<bool> {
        self.request(|reply| Command::Respawn { slot, reply }).await
    }

    /// Query the current scene (read-only snapshot)
    pub async fn query_scene(&self) -> Result<SceneState> {
        self.request(|reply| Command::QueryScene { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Entities` - Spawns, corrections, removals and full syncs
    /// - `Topic::Combat` - Hits and boss encounters
    /// - `Topic::Progress` - Pickups and high scores
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use jumpjump_runtime::Topic;
    ///
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // Handle combat events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<SyncEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to every topic.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_bus.subscribe_all()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
