//! Progress written by a running session survives a restart.

use std::sync::Arc;

use jumpjump_core::{HitOutcome, HitTarget, PlayerSlot, Position, Projectile, SpawnRequest};
use jumpjump_runtime::{
    CoopRuntime, FileStore, InMemoryStore, KeyValueStore, ProgressRepository, RuntimeConfig, SaveLocation,
    SyncEvent, Topic, keys,
};

#[tokio::test]
async fn boss_defeat_and_coins_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = RuntimeConfig::host();
    config.player_name = "ana".to_owned();
    config.save_data = SaveLocation::Dir(dir.path().to_path_buf());

    let runtime = CoopRuntime::builder().config(config).build().await.unwrap();
    let handle = runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);

    handle
        .spawn(SpawnRequest::coin(3, Position::new(5.0, 5.0)))
        .await
        .unwrap();
    handle
        .collect_coin(jumpjump_core::EntityId::coin(1))
        .await
        .unwrap();

    handle
        .start_boss(2, Position::new(400.0, 200.0), 10)
        .await
        .unwrap();
    let outcome = handle
        .projectile_hit(Projectile::from_player(PlayerSlot::One, 10), HitTarget::Boss(2))
        .await
        .unwrap();
    assert!(outcome.is_defeat());

    let mut defeated = false;
    while let Ok(event) = combat.try_recv() {
        defeated |= matches!(event, SyncEvent::BossDefeated { level: 2, .. });
    }
    assert!(defeated);

    drop(handle);
    runtime.shutdown().await.unwrap();

    let store = Arc::new(FileStore::in_dir(dir.path()).unwrap());
    let progress = ProgressRepository::new(store.clone());
    assert_eq!(progress.defeated_boss_levels().unwrap(), vec![2]);
    assert!(progress.is_boss_defeated("ana", 2).unwrap());
    // 3 from the coin, 10 from the boss.
    assert_eq!(progress.coins().unwrap(), 13);
    assert_eq!(progress.high_score().unwrap(), 1_000);
    assert_eq!(
        store.get(keys::PLAYER_COINS).unwrap().as_deref(),
        Some("13")
    );
}

#[tokio::test]
async fn boss_marker_prefers_stored_player_name() {
    let progress = ProgressRepository::new(Arc::new(InMemoryStore::new()));
    progress.set_player_name("mika").unwrap();

    let mut config = RuntimeConfig::host();
    config.player_name = "fallback".to_owned();
    let runtime = CoopRuntime::builder()
        .config(config)
        .progress(progress.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle
        .start_boss(1, Position::new(0.0, 0.0), 5)
        .await
        .unwrap();
    handle
        .projectile_hit(Projectile::from_player(PlayerSlot::One, 5), HitTarget::Boss(1))
        .await
        .unwrap();

    assert!(progress.is_boss_defeated("mika", 1).unwrap());
    assert!(!progress.is_boss_defeated("fallback", 1).unwrap());
}

#[tokio::test]
async fn purchased_lives_are_granted_once() {
    let dir = tempfile::tempdir().unwrap();
    let progress = ProgressRepository::new(Arc::new(FileStore::in_dir(dir.path()).unwrap()));
    progress.add_purchased_lives(2).unwrap();

    let runtime = CoopRuntime::builder()
        .config(RuntimeConfig::client())
        .progress(progress.clone())
        .build()
        .await
        .unwrap();
    let scene = runtime.handle().query_scene().await.unwrap();
    let baseline = jumpjump_core::PlayerState::DEFAULT_LIVES;
    assert_eq!(scene.player(PlayerSlot::Two).lives, baseline + 2);
    assert_eq!(progress.take_purchased_lives().unwrap(), 0);
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(FileStore::FILE_NAME), b"{oops").unwrap();
    assert!(FileStore::in_dir(dir.path()).is_err());
}

#[test]
fn hit_outcome_serializes_for_event_consumers() {
    let outcome = HitOutcome::Damaged {
        target: HitTarget::Player(PlayerSlot::Two),
        remaining: 2,
    };
    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("Damaged"));
}
