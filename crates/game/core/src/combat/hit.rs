//! Projectile hits on players, enemies and the boss.

use crate::protocol::NetMessage;
use crate::spawn::{SpawnRequest, announce, try_spawn};
use crate::state::{
    BossState, EntityId, EntityKind, PlayerSlot, Position, SceneState, Tint, Velocity,
};

use super::damage::{apply_damage, is_invincible};
use super::result::{Absorption, HitOutcome, HitTarget, IgnoreReason, Reward};

/// Who fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Owner {
    Player(PlayerSlot),
    Enemy,
    Boss,
}

/// A projectile at the moment it touches something.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub owner: Owner,
    pub damage: i32,
}

impl Projectile {
    pub const fn from_player(slot: PlayerSlot, damage: i32) -> Self {
        Self {
            owner: Owner::Player(slot),
            damage,
        }
    }

    pub const fn from_enemy(damage: i32) -> Self {
        Self {
            owner: Owner::Enemy,
            damage,
        }
    }

    pub const fn from_boss(damage: i32) -> Self {
        Self {
            owner: Owner::Boss,
            damage,
        }
    }
}

/// Resolves a projectile touching a human player.
///
/// A player's own projectile never hurts them. The teammate's projectile
/// hurts only when friendly fire is enabled.
pub fn on_projectile_hit_player(
    scene: &mut SceneState,
    projectile: &Projectile,
    victim: PlayerSlot,
) -> HitOutcome {
    if let Owner::Player(shooter) = projectile.owner {
        if shooter == victim {
            return HitOutcome::Ignored(IgnoreReason::OwnProjectile);
        }
        if !scene.config.friendly_fire {
            return HitOutcome::Ignored(IgnoreReason::FriendlyFireDisabled);
        }
    }

    let now = scene.clock;
    let window = scene.config.invincibility_ms;
    let debug = scene.config.debug_invincible;
    let player = scene.player_mut(victim);

    if player.dead {
        return HitOutcome::Ignored(IgnoreReason::AlreadyDefeated);
    }
    if is_invincible(player.last_hit_at, now, window) {
        return HitOutcome::Ignored(IgnoreReason::Invincible);
    }
    if debug {
        return HitOutcome::Absorbed(Absorption::Debug);
    }
    if player.shield {
        player.shield = false;
        player.last_hit_at = Some(now);
        return HitOutcome::Absorbed(Absorption::Shield);
    }

    player.health = apply_damage(player.health, projectile.damage);
    player.last_hit_at = Some(now);
    if player.health > 0 {
        return HitOutcome::Damaged {
            target: HitTarget::Player(victim),
            remaining: player.health,
        };
    }

    player.dead = true;
    player.lives = player.lives.saturating_sub(1);
    HitOutcome::Defeated {
        target: HitTarget::Player(victim),
        reward: Reward::NONE,
    }
}

/// Resolves a player projectile touching a tracked enemy.
///
/// Damage is applied locally on both peers. The host announces the new enemy
/// state (and on defeat spawns a drop coin); the client reports the hit so the
/// host can apply it authoritatively. Score is credited only on the peer that
/// controls the shooter.
pub fn on_projectile_hit_enemy(
    scene: &mut SceneState,
    projectile: &Projectile,
    id: &EntityId,
) -> HitOutcome {
    let Owner::Player(shooter) = projectile.owner else {
        return HitOutcome::Ignored(IgnoreReason::HostileToHostile);
    };

    let now = scene.clock;
    let window = scene.config.invincibility_ms;

    let Some(record) = scene.enemies.get_mut(id) else {
        return HitOutcome::Ignored(IgnoreReason::TargetMissing);
    };
    if !record.alive {
        return HitOutcome::Ignored(IgnoreReason::AlreadyDefeated);
    }
    if !scene.sprites.is_live(record.sprite) {
        return HitOutcome::Ignored(IgnoreReason::TargetMissing);
    }
    if is_invincible(record.last_hit_at, now, window) {
        return HitOutcome::Ignored(IgnoreReason::Invincible);
    }

    record.health = apply_damage(record.health, projectile.damage);
    record.last_hit_at = Some(now);
    let remaining = record.health;
    let defeated = remaining <= 0;
    let mut position = record.position;

    if defeated {
        record.alive = false;
        record.died_at = Some(now);
        record.velocity = Velocity::ZERO;
        if let Some(sprite) = scene.sprites.get_mut(record.sprite) {
            sprite.tint = Some(Tint::Death);
            sprite.velocity = Velocity::ZERO;
            position = sprite.position;
        }
    }

    if scene.is_host() {
        announce(scene, EntityKind::Enemy, id);
    } else {
        scene.send(NetMessage::EnemyHit {
            enemy_id: id.clone(),
            damage: projectile.damage,
            by: shooter,
        });
    }

    let target = HitTarget::Enemy(id.clone());
    if !defeated {
        return HitOutcome::Damaged { target, remaining };
    }

    if scene.is_host() {
        let value = scene.config.rewards.enemy_drop_value;
        let dropped = try_spawn(scene, SpawnRequest::drop_coin(value, position));
        debug_assert!(dropped.is_ok(), "host drop spawn rejected: {dropped:?}");
    }

    let reward = if shooter == scene.local_slot {
        Reward {
            score: scene.config.rewards.enemy_score,
            coins: 0,
        }
    } else {
        Reward::NONE
    };
    scene.score = scene.score.saturating_add(reward.score);

    HitOutcome::Defeated { target, reward }
}

/// Resolves a player projectile touching the active boss.
///
/// Boss defeat is a team win: the reward is credited to the local player
/// whoever landed the final hit.
pub fn on_projectile_hit_boss(scene: &mut SceneState, projectile: &Projectile) -> HitOutcome {
    if !matches!(projectile.owner, Owner::Player(_)) {
        return HitOutcome::Ignored(IgnoreReason::HostileToHostile);
    }

    let now = scene.clock;
    let window = scene.config.invincibility_ms;

    let Some(boss) = scene.boss.as_mut() else {
        return HitOutcome::Ignored(IgnoreReason::TargetMissing);
    };
    if boss.defeated {
        return HitOutcome::Ignored(IgnoreReason::AlreadyDefeated);
    }
    if !boss.active {
        return HitOutcome::Ignored(IgnoreReason::TargetMissing);
    }
    if is_invincible(boss.last_hit_at, now, window) {
        return HitOutcome::Ignored(IgnoreReason::Invincible);
    }

    boss.health = apply_damage(boss.health, projectile.damage);
    boss.last_hit_at = Some(now);
    let target = HitTarget::Boss(boss.level_index);
    if boss.health > 0 {
        return HitOutcome::Damaged {
            target,
            remaining: boss.health,
        };
    }

    boss.defeated = true;
    boss.active = false;
    boss.ui_visible = false;

    let reward = Reward {
        score: scene.config.rewards.boss_score,
        coins: scene.config.rewards.boss_coins,
    };
    scene.score = scene.score.saturating_add(reward.score);
    scene.coin_purse = scene.coin_purse.saturating_add(reward.coins);

    HitOutcome::Defeated { target, reward }
}

/// Starts the boss encounter of `level_index`, replacing any previous boss.
pub fn start_boss(
    scene: &mut SceneState,
    level_index: u32,
    position: Position,
    health: i32,
) -> &BossState {
    scene
        .boss
        .insert(BossState::new(level_index, position, health))
}

/// Brings a defeated player back at full health.
///
/// The life was already spent on defeat, so this fails only for a player who
/// is still standing or has none left.
pub fn respawn_player(scene: &mut SceneState, slot: PlayerSlot) -> bool {
    scene.player_mut(slot).respawn()
}
