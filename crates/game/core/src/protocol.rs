//! Wire payloads exchanged between the co-op peers.
//!
//! Field names are load-bearing: they match what the realtime transport
//! carries as JSON. Optional fields default instead of failing so that a
//! partially filled payload degrades to a no-op for the missing part.

use crate::state::{
    CoinRecord, EnemyRecord, EntityId, PlayerSlot, Position, PowerUpRecord, Velocity,
};

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

/// Authoritative state of one enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyState {
    pub enemy_id: EntityId,
    pub x: f32,
    pub y: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub velocity_x: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub velocity_y: f32,
    /// Missing health leaves the local value untouched.
    #[cfg_attr(feature = "serde", serde(default))]
    pub health: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub is_alive: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub enemy_type: Option<String>,
}

impl EnemyState {
    pub fn new(enemy_id: impl Into<EntityId>, x: f32, y: f32) -> Self {
        Self {
            enemy_id: enemy_id.into(),
            x,
            y,
            velocity_x: 0.0,
            velocity_y: 0.0,
            health: None,
            is_alive: true,
            enemy_type: None,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_alive(mut self, alive: bool) -> Self {
        self.is_alive = alive;
        self
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.velocity_x = vx;
        self.velocity_y = vy;
        self
    }

    pub fn with_type(mut self, enemy_type: impl Into<String>) -> Self {
        self.enemy_type = Some(enemy_type.into());
        self
    }

    pub fn from_record(record: &EnemyRecord) -> Self {
        Self {
            enemy_id: record.id.clone(),
            x: record.position.x,
            y: record.position.y,
            velocity_x: record.velocity.x,
            velocity_y: record.velocity.y,
            health: Some(record.health),
            is_alive: record.alive,
            enemy_type: Some(record.kind.to_string()),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Velocity {
        Velocity::new(self.velocity_x, self.velocity_y)
    }
}

/// Authoritative state of one coin.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoinState {
    pub coin_id: EntityId,
    pub x: f32,
    pub y: f32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub value: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_collected: bool,
}

impl CoinState {
    pub fn new(coin_id: impl Into<EntityId>, x: f32, y: f32) -> Self {
        Self {
            coin_id: coin_id.into(),
            x,
            y,
            value: None,
            is_collected: false,
        }
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn collected(mut self) -> Self {
        self.is_collected = true;
        self
    }

    pub fn from_record(record: &CoinRecord) -> Self {
        Self {
            coin_id: record.id.clone(),
            x: record.position.x,
            y: record.position.y,
            value: Some(record.value),
            is_collected: record.collected,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Authoritative state of one power-up.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerUpState {
    pub powerup_id: EntityId,
    pub x: f32,
    pub y: f32,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_collected: bool,
}

impl PowerUpState {
    pub fn new(powerup_id: impl Into<EntityId>, x: f32, y: f32, kind: impl Into<String>) -> Self {
        Self {
            powerup_id: powerup_id.into(),
            x,
            y,
            kind: kind.into(),
            is_collected: false,
        }
    }

    pub fn collected(mut self) -> Self {
        self.is_collected = true;
        self
    }

    pub fn from_record(record: &PowerUpRecord) -> Self {
        Self {
            powerup_id: record.id.clone(),
            x: record.position.x,
            y: record.position.y,
            kind: record.kind.to_string(),
            is_collected: record.collected,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Every message the sync layer sends or consumes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "event", content = "data", rename_all = "snake_case")
)]
pub enum NetMessage {
    /// Spawn or update of one enemy.
    EnemyState(EnemyState),
    /// Spawn, update or collection of one coin.
    CoinState(CoinState),
    /// Spawn, update or collection of one power-up.
    PowerUpState(PowerUpState),
    /// Periodic full list of live enemies and coins.
    EntitiesSync {
        enemies: Vec<EnemyState>,
        coins: Vec<CoinState>,
    },
    /// A client's projectile hit an enemy; the host applies the damage.
    EnemyHit {
        enemy_id: EntityId,
        damage: i32,
        by: PlayerSlot,
    },
}

impl NetMessage {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            NetMessage::EnemyState(_) => "enemy_state",
            NetMessage::CoinState(_) => "coin_state",
            NetMessage::PowerUpState(_) => "power_up_state",
            NetMessage::EntitiesSync { .. } => "entities_sync",
            NetMessage::EnemyHit { .. } => "enemy_hit",
        }
    }
}
