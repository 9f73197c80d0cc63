//! Raw JSON messages as the realtime transport delivers them.

use jumpjump_core::{ApplyOutcome, EntityId, NetMessage, ReconcileOutcome};
use jumpjump_runtime::{CoopRuntime, RuntimeConfig, RuntimeError, SyncEvent, Topic};

async fn client() -> CoopRuntime {
    CoopRuntime::builder()
        .config(RuntimeConfig::client())
        .build()
        .await
        .expect("runtime should start")
}

#[tokio::test]
async fn enemy_state_json_is_applied() {
    let runtime = client().await;
    let handle = runtime.handle();

    let raw = r#"{"event":"enemy_state","data":{"enemy_id":"e3","x":120.5,"y":80,"health":12,"is_alive":true,"enemy_type":"bat"}}"#;
    let outcome = handle.deliver_json(raw).await.unwrap();
    assert!(matches!(
        outcome,
        ApplyOutcome::Entity(ReconcileOutcome::Applied { .. })
    ));

    let scene = handle.query_scene().await.unwrap();
    let record = scene.enemies.get(&EntityId::new("e3")).unwrap();
    assert_eq!(record.health, 12);
    assert!(record.alive);
}

#[test]
fn missing_optional_fields_use_defaults() {
    let raw = r#"{"event":"coin_state","data":{"coin_id":"coin_4","x":1,"y":2}}"#;
    let NetMessage::CoinState(coin) = serde_json::from_str::<NetMessage>(raw).unwrap() else {
        panic!("expected a coin state");
    };
    assert_eq!(coin.value, None);
    assert!(!coin.is_collected);
}

#[test]
fn power_up_type_field_round_trips() {
    let message = NetMessage::PowerUpState(jumpjump_core::PowerUpState::new(
        "powerup_1",
        5.0,
        6.0,
        "shield",
    ));
    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["event"], "power_up_state");
    assert_eq!(json["data"]["type"], "shield");
}

#[tokio::test]
async fn malformed_message_is_dropped_and_reported() {
    let runtime = client().await;
    let handle = runtime.handle();
    let mut events = handle.subscribe(Topic::Entities);

    let err = handle
        .deliver_json(r#"{"event":"enemy_state","data":{"x":1}}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Decode(_)));
    assert!(matches!(
        events.recv().await.unwrap(),
        SyncEvent::DecodeFailed { .. }
    ));

    let scene = handle.query_scene().await.unwrap();
    assert!(scene.enemies.is_empty());
    assert!(scene.sprites.is_empty());
}
