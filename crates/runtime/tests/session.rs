//! Two in-process runtimes, host and client, wired through channel sinks.

use jumpjump_core::{
    ApplyOutcome, EnemyState, EntityId, EntityKind, HitTarget, LevelBounds, NetMessage,
    PickupOutcome, PlayerSlot, PlayerState, Position, Projectile, ReconcileOutcome, SpawnOutcome,
    SyncConfig, Timestamp,
};
use jumpjump_runtime::{
    ChannelSink, CoopRuntime, RemovalReason, RuntimeConfig, RuntimeHandle, SyncEvent, Topic,
};
use tokio::sync::mpsc;

const SEED: u32 = 1234;

fn bounds() -> LevelBounds {
    LevelBounds::new(Position::new(0.0, 0.0), Position::new(800.0, 300.0))
}

async fn start(config: RuntimeConfig) -> (CoopRuntime, mpsc::Receiver<NetMessage>) {
    let (sink, outbound) = ChannelSink::pair(256);
    let runtime = CoopRuntime::builder()
        .config(config.with_seed(SEED))
        .sink(sink)
        .build()
        .await
        .expect("runtime should start");
    (runtime, outbound)
}

/// Delivers everything queued on `outbound` to `peer`, returning the outcomes.
async fn pump(outbound: &mut mpsc::Receiver<NetMessage>, peer: &RuntimeHandle) -> Vec<ApplyOutcome> {
    let mut outcomes = Vec::new();
    while let Ok(message) = outbound.try_recv() {
        outcomes.push(peer.deliver(message).await.expect("deliver"));
    }
    outcomes
}

#[tokio::test]
async fn seeded_level_is_adopted_without_duplicates() {
    let (host, mut host_out) = start(RuntimeConfig::host()).await;
    let (client, _client_out) = start(RuntimeConfig::client()).await;
    let (host_h, client_h) = (host.handle(), client.handle());

    let host_ids = host_h.populate_level(3, 2, bounds()).await.unwrap();
    let client_ids = client_h.populate_level(3, 2, bounds()).await.unwrap();
    assert_eq!(host_ids, client_ids);

    let before = client_h.query_scene().await.unwrap();
    assert_eq!(before.sprites.len(), 5);
    assert!(before.enemies.is_empty());

    let outcomes = pump(&mut host_out, &client_h).await;
    assert_eq!(outcomes.len(), 5);
    for outcome in &outcomes {
        let ApplyOutcome::Entity(ReconcileOutcome::Applied { spawn, .. }) = outcome else {
            panic!("unexpected outcome {outcome:?}");
        };
        assert!(matches!(spawn, Some(SpawnOutcome::Adopted { .. })));
    }

    let scene = client_h.query_scene().await.unwrap();
    assert_eq!(scene.sprites.len(), 5);
    assert_eq!(scene.enemies.len(), 3);
    assert_eq!(scene.coins.len(), 2);
    for id in &host_ids {
        let kind = if scene.enemies.contains(id) {
            EntityKind::Enemy
        } else {
            EntityKind::Coin
        };
        assert_eq!(scene.sprites_tagged(kind, id), 1);
    }

    drop((host_h, client_h));
    host.shutdown().await.unwrap();
    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn coin_collected_by_client_disappears_on_host() {
    let (host, mut host_out) = start(RuntimeConfig::host()).await;
    let (client, mut client_out) = start(RuntimeConfig::client()).await;
    let (host_h, client_h) = (host.handle(), client.handle());

    host_h.populate_level(0, 1, bounds()).await.unwrap();
    pump(&mut host_out, &client_h).await;

    let mut progress_rx = client_h.subscribe(Topic::Progress);
    let coin = EntityId::coin(1);
    let outcome = client_h.collect_coin(coin.clone()).await.unwrap();
    assert!(matches!(outcome, PickupOutcome::Coin { ref id, .. } if *id == coin));
    assert!(matches!(
        progress_rx.recv().await.unwrap(),
        SyncEvent::CoinCollected { .. }
    ));

    let outcomes = pump(&mut client_out, &host_h).await;
    assert_eq!(
        outcomes,
        vec![ApplyOutcome::Entity(ReconcileOutcome::Removed {
            id: coin.clone(),
            kind: EntityKind::Coin,
        })]
    );

    let scene = host_h.query_scene().await.unwrap();
    assert!(!scene.coins.contains(&coin));
    assert_eq!(scene.sprites_tagged(EntityKind::Coin, &coin), 0);

    // A second collection of the same coin is a no-op.
    assert_eq!(
        client_h.collect_coin(coin).await.unwrap(),
        PickupOutcome::Missing
    );
}

#[tokio::test]
async fn host_snapshot_collects_stale_client_entities() {
    let (host, mut host_out) = start(RuntimeConfig::host()).await;
    let (client, _client_out) = start(RuntimeConfig::client()).await;
    let (host_h, client_h) = (host.handle(), client.handle());

    host_h.populate_level(2, 0, bounds()).await.unwrap();
    pump(&mut host_out, &client_h).await;

    // An enemy the host no longer knows about.
    client_h
        .deliver(NetMessage::EnemyState(EnemyState::new("e99", 10.0, 10.0)))
        .await
        .unwrap();
    assert_eq!(client_h.query_scene().await.unwrap().enemies.len(), 3);

    let mut entity_rx = client_h.subscribe(Topic::Entities);
    let interval = RuntimeConfig::DEFAULT_FULL_SYNC_INTERVAL_MS;
    host_h.advance(Timestamp(interval)).await.unwrap();
    let outcomes = pump(&mut host_out, &client_h).await;

    let report = outcomes
        .iter()
        .find_map(|o| match o {
            ApplyOutcome::FullSync(report) => Some(report),
            _ => None,
        })
        .expect("host should have sent a snapshot");
    assert_eq!(
        report.collected,
        vec![(EntityKind::Enemy, EntityId::new("e99"))]
    );

    let scene = client_h.query_scene().await.unwrap();
    assert_eq!(scene.enemies.len(), 2);
    assert!(!scene.enemies.contains(&EntityId::new("e99")));

    let mut saw_gc = false;
    while let Ok(event) = entity_rx.try_recv() {
        if let SyncEvent::EntityRemoved {
            reason: RemovalReason::GarbageCollected,
            id,
            ..
        } = event
        {
            assert_eq!(id, EntityId::new("e99"));
            saw_gc = true;
        }
    }
    assert!(saw_gc);
}

#[tokio::test]
async fn client_cannot_originate_untracked_spawns() {
    let (client, mut client_out) = start(RuntimeConfig::client()).await;
    let handle = client.handle();

    let result = handle
        .spawn(jumpjump_core::SpawnRequest::enemy(
            Default::default(),
            Position::new(1.0, 1.0),
        ))
        .await;
    let err = result.unwrap_err();
    assert!(matches!(err, jumpjump_runtime::RuntimeError::Spawn(_)));
    assert_eq!(err.error_code(), Some("SPAWN_MISSING_IDENTIFIER"));
    assert_eq!(err.severity(), Some(jumpjump_core::ErrorSeverity::Recoverable));
    assert!(client_out.try_recv().is_err());
}

#[tokio::test]
async fn defeated_player_respawns_through_handle() {
    let (host, _host_out) = start(RuntimeConfig::host()).await;
    let handle = host.handle();
    let mut combat = handle.subscribe(Topic::Combat);

    assert!(!handle.respawn(PlayerSlot::One).await.unwrap());

    let defeat = handle
        .projectile_hit(Projectile::from_enemy(1_000), HitTarget::Player(PlayerSlot::One))
        .await
        .unwrap();
    assert!(defeat.is_defeat());
    assert!(handle.respawn(PlayerSlot::One).await.unwrap());

    let mut respawned = None;
    while let Ok(event) = combat.try_recv() {
        if let SyncEvent::PlayerRespawned { slot, lives } = event {
            respawned = Some((slot, lives));
        }
    }
    assert_eq!(
        respawned,
        Some((PlayerSlot::One, PlayerState::DEFAULT_LIVES - 1))
    );

    let scene = handle.query_scene().await.unwrap();
    let player = scene.player(PlayerSlot::One);
    assert!(!player.dead);
    assert_eq!(player.health, PlayerState::DEFAULT_HEALTH);
}

#[tokio::test]
async fn invalid_sync_config_is_classified_as_validation() {
    let config = RuntimeConfig::host().with_sync(SyncConfig::new().with_lerp_factor(1.0));

    let Err(err) = CoopRuntime::builder().config(config).build().await else {
        panic!("runtime should refuse an out-of-range lerp factor");
    };

    assert_eq!(err.error_code(), Some("CONFIG_LERP_FACTOR"));
    assert_eq!(err.severity(), Some(jumpjump_core::ErrorSeverity::Validation));
}
