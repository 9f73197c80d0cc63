//! Single entry point for inbound messages and frame updates.
//!
//! The [`SyncEngine`] borrows the scene for the duration of one callback.
//! Network messages go through [`SyncEngine::apply`] in arrival order, frame
//! ticks through [`SyncEngine::advance`]. Both mutate the scene synchronously
//! and return what they did; outbound messages accumulate in the scene outbox.

use crate::combat::{HitOutcome, Projectile, on_projectile_hit_enemy};
use crate::protocol::NetMessage;
use crate::reconcile::{
    ReconcileOutcome, apply_coin_state, apply_enemy_state, apply_power_up_state, remove_entity,
};
use crate::state::{EntityId, EntityKind, SceneState, SpriteFlags, Timestamp, Velocity};
use crate::sync::{SyncReport, handle_entities_sync};

/// What one inbound message did to the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum ApplyOutcome {
    Entity(ReconcileOutcome),
    FullSync(SyncReport),
    Hit(HitOutcome),
    /// Hit report received by a client; only the host arbitrates them.
    HitReportIgnored,
}

/// What one frame update did to the scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Milliseconds of scene time covered by this frame.
    pub elapsed_ms: u64,
    /// Enemies removed because their death linger ran out.
    pub expired: Vec<EntityId>,
}

/// Drives one scene: inbound messages and frame ticks.
pub struct SyncEngine<'a> {
    scene: &'a mut SceneState,
}

impl<'a> SyncEngine<'a> {
    pub fn new(scene: &'a mut SceneState) -> Self {
        Self { scene }
    }

    /// Applies one inbound message.
    pub fn apply(&mut self, message: &NetMessage) -> ApplyOutcome {
        match message {
            NetMessage::EnemyState(state) => {
                ApplyOutcome::Entity(apply_enemy_state(self.scene, state))
            }
            NetMessage::CoinState(state) => ApplyOutcome::Entity(apply_coin_state(self.scene, state)),
            NetMessage::PowerUpState(state) => {
                ApplyOutcome::Entity(apply_power_up_state(self.scene, state))
            }
            NetMessage::EntitiesSync { enemies, coins } => {
                ApplyOutcome::FullSync(handle_entities_sync(self.scene, enemies, coins))
            }
            NetMessage::EnemyHit {
                enemy_id,
                damage,
                by,
            } => {
                if !self.scene.is_host() {
                    return ApplyOutcome::HitReportIgnored;
                }
                let projectile = Projectile::from_player(*by, *damage);
                ApplyOutcome::Hit(on_projectile_hit_enemy(self.scene, &projectile, enemy_id))
            }
        }
    }

    /// Moves the scene clock to `now` and runs one frame.
    ///
    /// Active sprites move by their velocity; gravity bodies accelerate and come
    /// to rest on the ground line. Enemies whose death linger has run out are
    /// removed. A `now` earlier than the scene clock covers zero time.
    pub fn advance(&mut self, now: Timestamp) -> FrameReport {
        let elapsed_ms = now.since(self.scene.clock);
        if now > self.scene.clock {
            self.scene.clock = now;
        }
        let seconds = elapsed_ms as f32 / 1000.0;

        self.integrate(seconds);
        if self.scene.is_host() {
            self.follow_sprites();
        }
        let expired = self.expire_dead_enemies();

        FrameReport {
            elapsed_ms,
            expired,
        }
    }

    fn integrate(&mut self, seconds: f32) {
        if seconds <= 0.0 {
            return;
        }
        let gravity = self.scene.config.gravity;
        let ground = self.scene.config.ground_y;

        for sprite in self.scene.sprites.iter_mut().filter(|s| s.is_active()) {
            let falls = sprite.flags.contains(SpriteFlags::GRAVITY);
            if falls {
                sprite.velocity.y += gravity * seconds;
            }
            sprite.position = sprite.position.step(sprite.velocity, seconds);
            if falls && sprite.position.y >= ground {
                sprite.position.y = ground;
                sprite.velocity = Velocity::ZERO;
            }
        }
    }

    /// On the host the sprites are the truth; mirror them into the records
    /// snapshots are built from.
    fn follow_sprites(&mut self) {
        let SceneState {
            sprites,
            enemies,
            coins,
            power_ups,
            ..
        } = &mut *self.scene;

        for record in enemies.iter_mut() {
            if let Some(sprite) = sprites.get(record.sprite) {
                record.position = sprite.position;
                record.velocity = sprite.velocity;
            }
        }
        for record in coins.iter_mut() {
            if let Some(sprite) = sprites.get(record.sprite) {
                record.position = sprite.position;
                record.velocity = sprite.velocity;
            }
        }
        for record in power_ups.iter_mut() {
            if let Some(sprite) = sprites.get(record.sprite) {
                record.position = sprite.position;
            }
        }
    }

    fn expire_dead_enemies(&mut self) -> Vec<EntityId> {
        let now = self.scene.clock;
        let linger = self.scene.config.death_linger_ms;
        let expired: Vec<EntityId> = self
            .scene
            .enemies
            .iter()
            .filter(|r| r.died_at.is_some_and(|at| now.since(at) >= linger))
            .map(|r| r.id.clone())
            .collect();

        for id in &expired {
            remove_entity(self.scene, EntityKind::Enemy, id);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::protocol::{CoinState, EnemyState};
    use crate::spawn::{SpawnRequest, try_spawn};
    use crate::state::{PlayerSlot, Position};

    #[test]
    fn e7_scenario_lingers_then_expires() {
        let mut scene = SceneState::client(SyncConfig::default(), 42);
        let mut engine = SyncEngine::new(&mut scene);
        engine.advance(Timestamp(1_000));

        engine.apply(&NetMessage::EnemyState(
            EnemyState::new("e7", 305.0, 150.0).with_health(18),
        ));
        engine.apply(&NetMessage::EnemyState(
            EnemyState::new("e7", 305.0, 150.0)
                .with_health(0)
                .with_alive(false),
        ));

        let report = engine.advance(Timestamp(1_300));
        assert!(report.expired.is_empty());
        let record = scene.enemies.get(&EntityId::new("e7")).unwrap();
        assert!(!record.alive);
        assert_eq!(record.health, 0);

        let report = SyncEngine::new(&mut scene).advance(Timestamp(1_600));
        assert_eq!(report.expired, vec![EntityId::new("e7")]);
        assert!(scene.enemies.is_empty());
        assert!(scene.sprites.is_empty());
    }

    #[test]
    fn velocity_moves_sprites_between_ticks() {
        let mut scene = SceneState::client(SyncConfig::default(), 1);
        let mut engine = SyncEngine::new(&mut scene);
        engine.apply(&NetMessage::EnemyState(
            EnemyState::new("e1", 100.0, 100.0).with_velocity(50.0, 0.0),
        ));

        engine.advance(Timestamp(500));

        let key = scene.enemies.get(&EntityId::new("e1")).unwrap().sprite;
        assert_eq!(scene.sprites.get(key).unwrap().position, Position::new(125.0, 100.0));
    }

    #[test]
    fn drop_coins_fall_and_rest_on_the_ground() {
        let mut scene = SceneState::client(SyncConfig::default(), 1);
        let ground = scene.config.ground_y;
        let mut engine = SyncEngine::new(&mut scene);
        engine.apply(&NetMessage::CoinState(CoinState::new("coin_drop_1", 10.0, 0.0)));

        for step in 1..=20 {
            engine.advance(Timestamp(step * 100));
        }

        let key = scene.coins.get(&EntityId::new("coin_drop_1")).unwrap().sprite;
        let sprite = scene.sprites.get(key).unwrap();
        assert_eq!(sprite.position.y, ground);
        assert_eq!(sprite.velocity, Velocity::ZERO);
    }

    #[test]
    fn host_arbitrates_client_hit_reports() {
        let mut host = SceneState::host(SyncConfig::default(), 1);
        let id = try_spawn(
            &mut host,
            SpawnRequest::enemy(Default::default(), Position::new(10.0, 10.0)),
        )
        .unwrap()
        .id()
        .clone();
        let report = NetMessage::EnemyHit {
            enemy_id: id.clone(),
            damage: 5,
            by: PlayerSlot::Two,
        };

        let outcome = SyncEngine::new(&mut host).apply(&report);
        assert!(matches!(outcome, ApplyOutcome::Hit(ref hit) if hit.is_applied()));
        assert_eq!(host.enemies.get(&id).unwrap().health, 15);

        let mut client = SceneState::client(SyncConfig::default(), 1);
        assert_eq!(
            SyncEngine::new(&mut client).apply(&report),
            ApplyOutcome::HitReportIgnored
        );
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut scene = SceneState::host(SyncConfig::default(), 1);
        let mut engine = SyncEngine::new(&mut scene);
        engine.advance(Timestamp(1_000));
        let report = engine.advance(Timestamp(400));
        assert_eq!(report.elapsed_ms, 0);
        assert_eq!(scene.clock, Timestamp(1_000));
    }
}
