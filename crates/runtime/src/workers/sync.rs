//! Sync worker that owns the scene of one co-op session.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle) one at a
//! time, applies them through the core sync and combat rules, publishes
//! events, and flushes the scene outbox to the outbound sink before taking
//! the next command. Commands are therefore applied strictly in arrival
//! order and no other task ever touches the scene.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use jumpjump_core::{
    ApplyOutcome, Correction, EntityId, EntityKind, FrameReport, HitOutcome, HitTarget, LevelBounds,
    NetMessage, PickupOutcome, PlayerSlot, Position, Projectile, ReconcileOutcome, SceneState,
    SpawnOutcome, SpawnRequest, SyncEngine, SyncReport, Timestamp, Transition, collect_coin,
    collect_power_up, on_projectile_hit_boss, on_projectile_hit_enemy, on_projectile_hit_player,
    populate_level, respawn_player, snapshot_entities, start_boss, try_spawn,
};

use crate::api::{OutboundSink, Result};
use crate::events::{EventBus, RemovalReason, SyncEvent};
use crate::repository::ProgressRepository;

/// Local pickup requests.
#[derive(Debug, Clone)]
pub enum Pickup {
    Coin(EntityId),
    PowerUp { id: EntityId, slot: PlayerSlot },
}

/// Commands that can be sent to the sync worker
pub enum Command {
    /// Apply one inbound network message.
    Deliver {
        message: NetMessage,
        reply: oneshot::Sender<ApplyOutcome>,
    },
    /// Run one frame at scene time `now`.
    Advance {
        now: Timestamp,
        reply: oneshot::Sender<FrameReport>,
    },
    Spawn {
        request: SpawnRequest,
        reply: oneshot::Sender<Result<SpawnOutcome>>,
    },
    PopulateLevel {
        enemies: u32,
        coins: u32,
        bounds: LevelBounds,
        reply: oneshot::Sender<Vec<EntityId>>,
    },
    ProjectileHit {
        projectile: Projectile,
        target: HitTarget,
        reply: oneshot::Sender<HitOutcome>,
    },
    Collect {
        pickup: Pickup,
        reply: oneshot::Sender<PickupOutcome>,
    },
    StartBoss {
        level: u32,
        position: Position,
        health: i32,
        reply: oneshot::Sender<()>,
    },
    /// Revive a defeated player; replies whether a life was available.
    Respawn {
        slot: PlayerSlot,
        reply: oneshot::Sender<bool>,
    },
    /// Query the current scene (read-only copy).
    QueryScene { reply: oneshot::Sender<SceneState> },
}

/// Settings the worker needs beyond the scene itself.
pub struct WorkerSettings {
    pub player_name: String,
    pub full_sync_interval_ms: u64,
}

/// Background task that processes sync commands.
pub struct SyncWorker {
    scene: SceneState,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    sink: Arc<dyn OutboundSink>,
    progress: Option<ProgressRepository>,
    settings: WorkerSettings,
    last_snapshot: Timestamp,
}

impl SyncWorker {
    pub fn new(
        scene: SceneState,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        sink: Arc<dyn OutboundSink>,
        progress: Option<ProgressRepository>,
        settings: WorkerSettings,
    ) -> Self {
        info!(
            "SyncWorker initialized as {} (seed state {}, snapshot interval {}ms)",
            scene.authority,
            scene.rng.state(),
            settings.full_sync_interval_ms
        );

        let last_snapshot = scene.clock;
        Self {
            scene,
            command_rx,
            event_bus,
            sink,
            progress,
            settings,
            last_snapshot,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }
        self.scene.teardown();
        debug!("SyncWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Deliver { message, reply } => {
                let outcome = self.handle_message(&message);
                self.respond("Deliver", reply, outcome).await;
            }
            Command::Advance { now, reply } => {
                let report = self.handle_advance(now);
                self.respond("Advance", reply, report).await;
            }
            Command::Spawn { request, reply } => {
                let kind = request.spec.entity_kind();
                let result: Result<SpawnOutcome> =
                    try_spawn(&mut self.scene, request).map_err(Into::into);
                match &result {
                    Ok(outcome) => self.publish_spawn(kind, outcome),
                    Err(e) => e.log("Spawn"),
                }
                self.respond("Spawn", reply, result).await;
            }
            Command::PopulateLevel {
                enemies,
                coins,
                bounds,
                reply,
            } => {
                let ids = populate_level(&mut self.scene, enemies, coins, bounds);
                debug!("Populated level with {} seeded entities", ids.len());
                self.respond("PopulateLevel", reply, ids).await;
            }
            Command::ProjectileHit {
                projectile,
                target,
                reply,
            } => {
                let outcome = self.handle_hit(&projectile, target);
                self.respond("ProjectileHit", reply, outcome).await;
            }
            Command::Collect { pickup, reply } => {
                let outcome = self.handle_pickup(pickup);
                self.respond("Collect", reply, outcome).await;
            }
            Command::StartBoss {
                level,
                position,
                health,
                reply,
            } => {
                start_boss(&mut self.scene, level, position, health);
                self.event_bus.publish(SyncEvent::BossStarted { level });
                self.respond("StartBoss", reply, ()).await;
            }
            Command::Respawn { slot, reply } => {
                let revived = respawn_player(&mut self.scene, slot);
                if revived {
                    let lives = self.scene.player(slot).lives;
                    info!("{} respawned ({} lives left)", slot, lives);
                    self.event_bus
                        .publish(SyncEvent::PlayerRespawned { slot, lives });
                } else {
                    debug!("{} cannot respawn", slot);
                }
                self.respond("Respawn", reply, revived).await;
            }
            Command::QueryScene { reply } => {
                let scene = self.scene.clone();
                self.respond("QueryScene", reply, scene).await;
            }
        }
    }

    /// Flushes the outbox, then replies. Callers that see the reply can rely
    /// on every message it produced already being in the sink.
    async fn respond<T>(&mut self, command: &str, reply: oneshot::Sender<T>, value: T) {
        self.flush_outbox().await;
        if reply.send(value).is_err() {
            debug!("{} reply channel closed (caller dropped)", command);
        }
    }

    fn handle_message(&mut self, message: &NetMessage) -> ApplyOutcome {
        let outcome = SyncEngine::new(&mut self.scene).apply(message);
        match &outcome {
            ApplyOutcome::Entity(entity) => self.publish_reconcile(entity),
            ApplyOutcome::FullSync(report) => self.publish_full_sync(report),
            ApplyOutcome::Hit(hit) => self.publish_hit(hit),
            ApplyOutcome::HitReportIgnored => {
                debug!("Ignoring {} on a non-host peer", message.label());
            }
        }
        outcome
    }

    fn handle_advance(&mut self, now: Timestamp) -> FrameReport {
        let report = SyncEngine::new(&mut self.scene).advance(now);
        for id in &report.expired {
            self.event_bus.publish(SyncEvent::EntityRemoved {
                kind: EntityKind::Enemy,
                id: id.clone(),
                reason: RemovalReason::Expired,
            });
        }

        let interval = self.settings.full_sync_interval_ms;
        if self.scene.is_host()
            && interval > 0
            && self.scene.clock.since(self.last_snapshot) >= interval
        {
            self.last_snapshot = self.scene.clock;
            let snapshot = snapshot_entities(&self.scene);
            if let NetMessage::EntitiesSync { enemies, coins } = &snapshot {
                self.event_bus.publish(SyncEvent::SnapshotSent {
                    enemies: enemies.len(),
                    coins: coins.len(),
                });
            }
            self.scene.send(snapshot);
        }

        report
    }

    fn handle_hit(&mut self, projectile: &Projectile, target: HitTarget) -> HitOutcome {
        let outcome = match &target {
            HitTarget::Player(slot) => on_projectile_hit_player(&mut self.scene, projectile, *slot),
            HitTarget::Enemy(id) => on_projectile_hit_enemy(&mut self.scene, projectile, id),
            HitTarget::Boss(_) => on_projectile_hit_boss(&mut self.scene, projectile),
        };
        self.publish_hit(&outcome);
        outcome
    }

    fn handle_pickup(&mut self, pickup: Pickup) -> PickupOutcome {
        let outcome = match &pickup {
            Pickup::Coin(id) => collect_coin(&mut self.scene, id),
            Pickup::PowerUp { id, slot } => collect_power_up(&mut self.scene, *slot, id),
        };

        match (&outcome, &pickup) {
            (PickupOutcome::Coin { id, value }, _) => {
                self.event_bus.publish(SyncEvent::CoinCollected {
                    id: id.clone(),
                    value: *value,
                });
                let value = *value;
                self.persist("coin pickup", |progress| progress.add_coins(value).map(drop));
            }
            (PickupOutcome::PowerUp { id, kind }, Pickup::PowerUp { slot, .. }) => {
                self.event_bus.publish(SyncEvent::PowerUpCollected {
                    id: id.clone(),
                    kind: *kind,
                    slot: *slot,
                });
            }
            _ => debug!("Pickup of untracked entity ignored: {:?}", pickup),
        }
        outcome
    }

    fn publish_spawn(&self, kind: EntityKind, outcome: &SpawnOutcome) {
        if !outcome.is_new() {
            return;
        }
        self.event_bus.publish(SyncEvent::EntitySpawned {
            kind,
            id: outcome.id().clone(),
            adopted: matches!(outcome, SpawnOutcome::Adopted { .. }),
        });
    }

    fn publish_reconcile(&self, outcome: &ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Applied {
                id,
                kind,
                spawn,
                correction,
                transition,
            } => {
                if let Some(spawn) = spawn {
                    self.publish_spawn(*kind, spawn);
                }
                if *correction != Correction::Unchanged {
                    self.event_bus.publish(SyncEvent::EntityCorrected {
                        kind: *kind,
                        id: id.clone(),
                        correction: *correction,
                    });
                }
                if *transition == Transition::Died {
                    self.event_bus.publish(SyncEvent::EnemyDied { id: id.clone() });
                }
            }
            ReconcileOutcome::Removed { id, kind } => {
                self.event_bus.publish(SyncEvent::EntityRemoved {
                    kind: *kind,
                    id: id.clone(),
                    reason: RemovalReason::Collected,
                });
            }
            ReconcileOutcome::Skipped { id, kind, reason } => {
                debug!("Skipped {} state for {}: {:?}", kind, id, reason);
                self.event_bus.publish(SyncEvent::MessageSkipped {
                    kind: *kind,
                    id: id.clone(),
                    reason: *reason,
                });
            }
        }
    }

    fn publish_full_sync(&self, report: &SyncReport) {
        for outcome in &report.applied {
            self.publish_reconcile(outcome);
        }
        for (kind, id) in &report.collected {
            self.event_bus.publish(SyncEvent::EntityRemoved {
                kind: *kind,
                id: id.clone(),
                reason: RemovalReason::GarbageCollected,
            });
        }
        if !report.collected.is_empty() {
            info!(
                "Full sync removed {} stale entities",
                report.collected.len()
            );
        }
        self.event_bus.publish(SyncEvent::FullSyncApplied {
            entries: report.applied.len(),
            collected: report.collected.len(),
        });
    }

    fn publish_hit(&self, outcome: &HitOutcome) {
        self.event_bus.publish(SyncEvent::Hit {
            outcome: outcome.clone(),
        });

        let HitOutcome::Defeated { target, reward } = outcome else {
            return;
        };
        match target {
            HitTarget::Boss(level) => {
                info!("Boss of level {} defeated", level);
                self.event_bus.publish(SyncEvent::BossDefeated {
                    level: *level,
                    reward: *reward,
                });
                let (level, coins) = (*level, reward.coins);
                let configured = self.settings.player_name.clone();
                self.persist("boss defeat", |progress| {
                    let player = progress.player_name()?.unwrap_or(configured);
                    progress.mark_boss_defeated(&player, level)?;
                    progress.add_coins(coins).map(drop)
                });
            }
            HitTarget::Enemy(id) => debug!("Enemy {} defeated", id),
            HitTarget::Player(slot) => info!("{} lost a life", slot),
        }

        if reward.score > 0 {
            self.record_score();
        }
    }

    fn record_score(&self) {
        let score = self.scene.score;
        let Some(progress) = &self.progress else {
            return;
        };
        match progress.record_score(score) {
            Ok(true) => self.event_bus.publish(SyncEvent::HighScore { score }),
            Ok(false) => {}
            Err(e) => warn!("Failed to persist high score: {}", e),
        }
    }

    /// Runs a progress write; failures are logged and never interrupt play.
    fn persist<F>(&self, what: &str, write: F)
    where
        F: FnOnce(&ProgressRepository) -> crate::repository::Result<()>,
    {
        if let Some(progress) = &self.progress
            && let Err(e) = write(progress)
        {
            warn!("Failed to persist {}: {}", what, e);
        }
    }

    async fn flush_outbox(&mut self) {
        for message in self.scene.drain_outbox() {
            let label = message.label();
            if let Err(e) = self.sink.send(message).await {
                warn!("Dropping outbound {}: {}", label, e);
            }
        }
    }
}
