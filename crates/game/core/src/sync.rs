//! Periodic full-sync sweep.
//!
//! The host periodically broadcasts the complete list of live enemies and
//! coins. The client applies every entry exactly like an incremental update
//! and then garbage-collects whatever the list no longer names: registered
//! records as well as unregistered sprites left over from seeded
//! pre-generation. There are no explicit destroy messages; this sweep is the
//! only way entities the host silently dropped disappear on the client.

use std::collections::BTreeSet;

use crate::protocol::{CoinState, EnemyState, NetMessage};
use crate::reconcile::{ReconcileOutcome, apply_coin_state, apply_enemy_state, remove_entity};
use crate::state::{EntityId, EntityKind, SceneState};

/// What a full-sync sweep changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncReport {
    /// Outcome of every listed entry, enemies first.
    pub applied: Vec<ReconcileOutcome>,
    /// Identifiers destroyed because the payload no longer lists them.
    pub collected: Vec<(EntityKind, EntityId)>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.collected.is_empty()
    }
}

/// Applies a full-sync payload and removes every enemy and coin it omits.
///
/// Ignored on the host, which produces the payload instead.
pub fn handle_entities_sync(
    scene: &mut SceneState,
    enemies: &[EnemyState],
    coins: &[CoinState],
) -> SyncReport {
    let mut report = SyncReport::default();
    if scene.is_host() {
        return report;
    }

    for state in enemies {
        report.applied.push(apply_enemy_state(scene, state));
    }
    for state in coins {
        report.applied.push(apply_coin_state(scene, state));
    }

    let listed_enemies: BTreeSet<&EntityId> = enemies.iter().map(|s| &s.enemy_id).collect();
    let listed_coins: BTreeSet<&EntityId> = coins
        .iter()
        .filter(|s| !s.is_collected)
        .map(|s| &s.coin_id)
        .collect();

    for (kind, listed) in [
        (EntityKind::Enemy, &listed_enemies),
        (EntityKind::Coin, &listed_coins),
    ] {
        for id in stale_ids(scene, kind, listed) {
            if remove_entity(scene, kind, &id) {
                report.collected.push((kind, id));
            }
        }
    }

    report
}

/// Builds the full-sync payload from the host's registries.
///
/// Collected coins are left out; dying enemies are listed with `is_alive`
/// false until their linger expires.
pub fn snapshot_entities(scene: &SceneState) -> NetMessage {
    let enemies = scene.enemies.iter().map(EnemyState::from_record).collect();
    let coins = scene
        .coins
        .iter()
        .filter(|r| !r.collected)
        .map(CoinState::from_record)
        .collect();
    NetMessage::EntitiesSync { enemies, coins }
}

/// Registered or tagged identifiers of `kind` missing from `listed`.
fn stale_ids(scene: &SceneState, kind: EntityKind, listed: &BTreeSet<&EntityId>) -> Vec<EntityId> {
    let registered: Box<dyn Iterator<Item = &EntityId> + '_> = match kind {
        EntityKind::Enemy => Box::new(scene.enemies.ids()),
        EntityKind::Coin => Box::new(scene.coins.ids()),
        EntityKind::PowerUp => Box::new(scene.power_ups.ids()),
    };
    let tagged = scene.sprites.group(kind).filter_map(|s| s.tag.as_ref());

    let stale: BTreeSet<&EntityId> = registered
        .chain(tagged)
        .filter(|id| !listed.contains(id))
        .collect();
    stale.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::spawn::{LevelBounds, SpawnRequest, populate_level, try_spawn};
    use crate::state::{EnemyKind, Position};

    fn client_with_entities() -> SceneState {
        let mut scene = SceneState::client(SyncConfig::default(), 3);
        apply_enemy_state(&mut scene, &EnemyState::new("e1", 10.0, 10.0));
        apply_enemy_state(&mut scene, &EnemyState::new("e2", 90.0, 10.0));
        apply_coin_state(&mut scene, &CoinState::new("coin_1", 40.0, 40.0));
        scene
    }

    #[test]
    fn empty_payload_collects_everything() {
        let mut scene = client_with_entities();

        let report = handle_entities_sync(&mut scene, &[], &[]);

        assert_eq!(report.collected.len(), 3);
        assert!(scene.enemies.is_empty());
        assert!(scene.coins.is_empty());
        assert!(scene.sprites.is_empty());
    }

    #[test]
    fn omitted_entries_are_removed_and_listed_ones_kept() {
        let mut scene = client_with_entities();

        handle_entities_sync(
            &mut scene,
            &[EnemyState::new("e2", 95.0, 10.0)],
            &[CoinState::new("coin_1", 40.0, 40.0)],
        );

        assert!(!scene.enemies.contains(&EntityId::new("e1")));
        assert!(scene.enemies.contains(&EntityId::new("e2")));
        assert!(scene.coins.contains(&EntityId::new("coin_1")));
        assert_eq!(scene.sprites.len(), 2);
    }

    #[test]
    fn unknown_listed_entries_are_created() {
        let mut scene = SceneState::client(SyncConfig::default(), 3);

        handle_entities_sync(
            &mut scene,
            &[EnemyState::new("e5", 1.0, 2.0).with_type("ghost")],
            &[CoinState::new("coin_drop_1", 3.0, 4.0)],
        );

        assert_eq!(
            scene.enemies.get(&EntityId::new("e5")).map(|r| r.kind),
            Some(EnemyKind::Ghost)
        );
        assert!(scene.coins.contains(&EntityId::new("coin_drop_1")));
    }

    #[test]
    fn applying_the_same_payload_twice_changes_nothing_more() {
        let mut scene = client_with_entities();
        let enemies = [EnemyState::new("e1", 20.0, 10.0)];
        let coins = [CoinState::new("coin_7", 5.0, 5.0)];

        handle_entities_sync(&mut scene, &enemies, &coins);
        let after_first = scene.clone();
        let second = handle_entities_sync(&mut scene, &enemies, &coins);

        assert!(second.collected.is_empty());
        assert_eq!(scene, after_first);
    }

    #[test]
    fn unadopted_pre_generated_sprites_are_collected() {
        let mut scene = SceneState::client(SyncConfig::default(), 11);
        let bounds = LevelBounds::new(Position::ORIGIN, Position::new(500.0, 300.0));
        let ids = populate_level(&mut scene, 2, 0, bounds);
        assert_eq!(scene.sprites.len(), 2);

        let listed = [EnemyState::new(ids[0].clone(), 0.0, 0.0)];
        let report = handle_entities_sync(&mut scene, &listed, &[]);

        assert_eq!(report.collected, vec![(EntityKind::Enemy, ids[1].clone())]);
        assert_eq!(scene.sprites.len(), 1);
        assert!(scene.enemies.contains(&ids[0]));
    }

    #[test]
    fn host_ignores_full_sync_and_snapshots_instead() {
        let mut host = SceneState::host(SyncConfig::default(), 3);
        try_spawn(&mut host, SpawnRequest::enemy(EnemyKind::Bat, Position::new(7.0, 8.0))).unwrap();
        try_spawn(&mut host, SpawnRequest::coin(2, Position::ORIGIN)).unwrap();

        let report = handle_entities_sync(&mut host, &[], &[]);
        assert!(report.is_empty());
        assert_eq!(host.enemies.len(), 1);

        let NetMessage::EntitiesSync { enemies, coins } = snapshot_entities(&host) else {
            panic!("expected entities sync");
        };
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].enemy_type.as_deref(), Some("bat"));
        assert_eq!(coins[0].value, Some(2));
    }
}
