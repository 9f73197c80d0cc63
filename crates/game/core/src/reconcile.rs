//! Incremental reconciliation of incoming authoritative state.
//!
//! Each handler is called once per received message for one entity and
//! follows the same shape:
//!
//! ```text
//! lookup:   registry → tagged sprite in the kind's group → spawn (adopt/create)
//! guard:    inactive or destroyed sprite → no-op
//! position: distance > snap_threshold → snap
//!           otherwise                 → blend by lerp_factor
//! state:    velocity verbatim, health clamped ≥ 0, alive flag transition
//! ```
//!
//! None of the handlers fail. Missing entities are spawned, stale handles are
//! skipped, and the result of every call is reported as a [`ReconcileOutcome`].

use crate::config::SyncConfig;
use crate::protocol::{CoinState, EnemyState, PowerUpState};
use crate::spawn::{SpawnOutcome, SpawnRequest, try_spawn};
use crate::state::{
    EnemyKind, EntityId, EntityKind, Position, PowerUpKind, SceneState, Sprite, SpriteTexture,
    Tint,
};

/// Position correction applied to a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Correction {
    /// Moved straight to the authoritative position.
    Snapped,
    /// Blended part of the way toward the authoritative position.
    Interpolated,
    /// Already in place, or the authoritative position was applied before.
    Unchanged,
}

/// Lifecycle change caused by a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    None,
    /// Enemy went from alive to dead; tinted and scheduled for removal.
    Died,
    /// Enemy reported alive again after having been dead.
    Revived,
}

/// Why a payload had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// The entity's sprite is inactive or already destroyed.
    InactiveSprite,
    /// The host owns this state and ignores remote updates for it.
    HostAuthoritative,
    /// Dead or collected entity that this peer never tracked.
    NotTracked,
    /// The spawn authority refused to create the entity.
    SpawnRejected,
}

/// Result of applying one payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ReconcileOutcome {
    Applied {
        id: EntityId,
        kind: EntityKind,
        /// Set when the entity had to be spawned or adopted first.
        spawn: Option<SpawnOutcome>,
        correction: Correction,
        transition: Transition,
    },
    /// Collected coin or power-up, destroyed and unregistered.
    Removed { id: EntityId, kind: EntityKind },
    Skipped {
        id: EntityId,
        kind: EntityKind,
        reason: SkipReason,
    },
}

impl ReconcileOutcome {
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Applied { id, .. } | Self::Removed { id, .. } | Self::Skipped { id, .. } => id,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Applies one authoritative enemy state.
pub fn apply_enemy_state(scene: &mut SceneState, state: &EnemyState) -> ReconcileOutcome {
    let id = state.enemy_id.clone();
    let kind = EntityKind::Enemy;

    if scene.is_host() {
        return skipped(id, kind, SkipReason::HostAuthoritative);
    }

    let enemy_kind = state
        .enemy_type
        .as_deref()
        .map(|tag| EnemyKind::from_tag(Some(tag)));

    let spawn = if scene.enemies.contains(&id) {
        None
    } else {
        // A dead enemy is only tracked when a pre-generated sprite exists to adopt.
        if !state.is_alive && scene.sprites.find_tagged(kind, &id).is_none() {
            return skipped(id, kind, SkipReason::NotTracked);
        }
        let mut request = SpawnRequest::enemy(enemy_kind.unwrap_or_default(), state.position())
            .with_id(id.clone());
        if let Some(health) = state.health {
            request = request.with_health(health);
        }
        match try_spawn(scene, request) {
            Ok(outcome) => Some(outcome),
            Err(_) => return skipped(id, kind, SkipReason::SpawnRejected),
        }
    };

    let clock = scene.clock;
    let SceneState {
        config,
        sprites,
        enemies,
        ..
    } = scene;
    let Some(record) = enemies.get_mut(&id) else {
        return skipped(id, kind, SkipReason::NotTracked);
    };
    let Some(sprite) = live_sprite(sprites.get_mut(record.sprite)) else {
        return skipped(id, kind, SkipReason::InactiveSprite);
    };

    let correction = correct_position(config, sprite, &mut record.synced_position, state.position());
    record.position = sprite.position;

    let velocity = state.velocity();
    sprite.velocity = velocity;
    record.velocity = velocity;

    if let Some(new_kind) = enemy_kind
        && new_kind != record.kind
    {
        record.kind = new_kind;
        sprite.texture = SpriteTexture::Enemy(new_kind);
    }

    if let Some(health) = state.health {
        record.health = health.max(0);
        record.max_health = record.max_health.max(record.health);
    }

    let transition = match (record.alive, state.is_alive) {
        (true, false) => {
            record.alive = false;
            record.died_at = Some(clock);
            sprite.tint = Some(Tint::Death);
            Transition::Died
        }
        (false, true) => {
            record.alive = true;
            record.died_at = None;
            sprite.tint = None;
            Transition::Revived
        }
        _ => Transition::None,
    };

    ReconcileOutcome::Applied {
        id,
        kind,
        spawn,
        correction,
        transition,
    }
}

/// Applies one authoritative coin state. Collection is terminal and immediate.
pub fn apply_coin_state(scene: &mut SceneState, state: &CoinState) -> ReconcileOutcome {
    let id = state.coin_id.clone();
    let kind = EntityKind::Coin;

    if state.is_collected {
        return collect_remote(scene, kind, id);
    }
    if scene.is_host() {
        return skipped(id, kind, SkipReason::HostAuthoritative);
    }

    let spawn = if scene.coins.contains(&id) {
        None
    } else {
        let request = SpawnRequest::coin(state.value.unwrap_or(1), state.position()).with_id(id.clone());
        match try_spawn(scene, request) {
            Ok(outcome) => Some(outcome),
            Err(_) => return skipped(id, kind, SkipReason::SpawnRejected),
        }
    };

    let SceneState {
        config,
        sprites,
        coins,
        ..
    } = scene;
    let Some(record) = coins.get_mut(&id) else {
        return skipped(id, kind, SkipReason::NotTracked);
    };
    let Some(sprite) = live_sprite(sprites.get_mut(record.sprite)) else {
        return skipped(id, kind, SkipReason::InactiveSprite);
    };

    let correction = correct_position(config, sprite, &mut record.synced_position, state.position());
    record.position = sprite.position;
    if let Some(value) = state.value {
        record.value = value;
    }

    ReconcileOutcome::Applied {
        id,
        kind,
        spawn,
        correction,
        transition: Transition::None,
    }
}

/// Applies one authoritative power-up state. Collection is terminal and immediate.
pub fn apply_power_up_state(scene: &mut SceneState, state: &PowerUpState) -> ReconcileOutcome {
    let id = state.powerup_id.clone();
    let kind = EntityKind::PowerUp;

    if state.is_collected {
        return collect_remote(scene, kind, id);
    }
    if scene.is_host() {
        return skipped(id, kind, SkipReason::HostAuthoritative);
    }

    let power_up = PowerUpKind::from_tag(&state.kind);
    let spawn = if scene.power_ups.contains(&id) {
        None
    } else {
        let request = SpawnRequest::power_up(power_up, state.position()).with_id(id.clone());
        match try_spawn(scene, request) {
            Ok(outcome) => Some(outcome),
            Err(_) => return skipped(id, kind, SkipReason::SpawnRejected),
        }
    };

    let SceneState {
        config,
        sprites,
        power_ups,
        ..
    } = scene;
    let Some(record) = power_ups.get_mut(&id) else {
        return skipped(id, kind, SkipReason::NotTracked);
    };
    let Some(sprite) = live_sprite(sprites.get_mut(record.sprite)) else {
        return skipped(id, kind, SkipReason::InactiveSprite);
    };

    let correction = correct_position(config, sprite, &mut record.synced_position, state.position());
    record.position = sprite.position;
    if power_up != record.kind {
        record.kind = power_up;
        sprite.texture = SpriteTexture::PowerUp(power_up);
    }

    ReconcileOutcome::Applied {
        id,
        kind,
        spawn,
        correction,
        transition: Transition::None,
    }
}

/// Snaps or blends `sprite` toward `target`.
///
/// `synced` remembers the last authoritative position a correction was applied
/// for; receiving the same position again leaves the sprite alone.
pub fn correct_position(
    config: &SyncConfig,
    sprite: &mut Sprite,
    synced: &mut Option<Position>,
    target: Position,
) -> Correction {
    if *synced == Some(target) {
        return Correction::Unchanged;
    }
    *synced = Some(target);

    let distance = sprite.position.distance(target);
    if distance > config.snap_threshold {
        sprite.position = target;
        Correction::Snapped
    } else if distance == 0.0 {
        Correction::Unchanged
    } else {
        sprite.position = sprite.position.lerp(target, config.lerp_factor);
        Correction::Interpolated
    }
}

/// Destroys the sprite and record of a tracked entity. Returns whether anything was removed.
pub(crate) fn remove_entity(scene: &mut SceneState, kind: EntityKind, id: &EntityId) -> bool {
    let sprite = match kind {
        EntityKind::Enemy => scene.enemies.remove(id).map(|r| r.sprite),
        EntityKind::Coin => scene.coins.remove(id).map(|r| r.sprite),
        EntityKind::PowerUp => scene.power_ups.remove(id).map(|r| r.sprite),
    };
    let removed_record = sprite.is_some();
    if let Some(key) = sprite {
        scene.sprites.destroy(key);
    }
    destroy_tagged(scene, kind, id) || removed_record
}

/// Destroys unregistered sprites tagged with `id`. Returns whether any existed.
fn destroy_tagged(scene: &mut SceneState, kind: EntityKind, id: &EntityId) -> bool {
    let mut destroyed = false;
    while let Some(key) = scene.sprites.find_tagged(kind, id) {
        scene.sprites.destroy(key);
        destroyed = true;
    }
    destroyed
}

fn collect_remote(scene: &mut SceneState, kind: EntityKind, id: EntityId) -> ReconcileOutcome {
    if remove_entity(scene, kind, &id) {
        ReconcileOutcome::Removed { id, kind }
    } else {
        skipped(id, kind, SkipReason::NotTracked)
    }
}

fn live_sprite(sprite: Option<&mut Sprite>) -> Option<&mut Sprite> {
    sprite.filter(|s| s.is_active())
}

fn skipped(id: EntityId, kind: EntityKind, reason: SkipReason) -> ReconcileOutcome {
    ReconcileOutcome::Skipped { id, kind, reason }
}
