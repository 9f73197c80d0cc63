//! Local pickups of coins and power-ups.
//!
//! Collection is terminal. The picking peer destroys the entity right away and
//! announces it collected; the other peer removes it on receipt.

use crate::protocol::{CoinState, NetMessage, PowerUpState};
use crate::reconcile::remove_entity;
use crate::state::{EntityId, EntityKind, PlayerSlot, PowerUpKind, SceneState};

/// Result of a pickup attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickupOutcome {
    Coin { id: EntityId, value: u32 },
    PowerUp { id: EntityId, kind: PowerUpKind },
    /// Not tracked (already collected, or never spawned here).
    Missing,
}

/// Collects a tracked coin for the local player.
pub fn collect_coin(scene: &mut SceneState, id: &EntityId) -> PickupOutcome {
    let Some(record) = scene.coins.get_mut(id) else {
        return PickupOutcome::Missing;
    };
    record.collected = true;
    let value = record.value;
    let message = NetMessage::CoinState(CoinState::from_record(record));

    scene.send(message);
    scene.coin_purse = scene.coin_purse.saturating_add(value);
    remove_entity(scene, EntityKind::Coin, id);

    PickupOutcome::Coin {
        id: id.clone(),
        value,
    }
}

/// Collects a tracked power-up and applies its effect to `slot`.
///
/// Shield and extra life change player state here. Movement and fire-rate
/// effects are returned for the caller to apply.
pub fn collect_power_up(scene: &mut SceneState, slot: PlayerSlot, id: &EntityId) -> PickupOutcome {
    let Some(record) = scene.power_ups.get_mut(id) else {
        return PickupOutcome::Missing;
    };
    record.collected = true;
    let kind = record.kind;
    let message = NetMessage::PowerUpState(PowerUpState::from_record(record));

    scene.send(message);
    let player = scene.player_mut(slot);
    match kind {
        PowerUpKind::Shield => player.shield = true,
        PowerUpKind::ExtraLife => player.lives = player.lives.saturating_add(1),
        PowerUpKind::SpeedBoost | PowerUpKind::DoubleJump | PowerUpKind::RapidFire => {}
    }
    remove_entity(scene, EntityKind::PowerUp, id);

    PickupOutcome::PowerUp {
        id: id.clone(),
        kind,
    }
}
