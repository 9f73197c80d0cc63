//! Human players and the boss.

use std::fmt;

use super::{EntityId, Position, Timestamp};

/// One of the two co-op seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub const fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    /// The teammate's seat.
    pub const fn other(self) -> PlayerSlot {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::One => f.write_str("player1"),
            PlayerSlot::Two => f.write_str("player2"),
        }
    }
}

/// Health and protection state of one human player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub slot: PlayerSlot,
    pub health: i32,
    pub max_health: i32,
    pub lives: u32,
    /// Absorbs exactly one hit, then clears.
    pub shield: bool,
    pub last_hit_at: Option<Timestamp>,
    pub dead: bool,
}

impl PlayerState {
    pub const DEFAULT_HEALTH: i32 = 100;
    pub const DEFAULT_LIVES: u32 = 3;

    pub fn new(slot: PlayerSlot) -> Self {
        Self {
            slot,
            health: Self::DEFAULT_HEALTH,
            max_health: Self::DEFAULT_HEALTH,
            lives: Self::DEFAULT_LIVES,
            shield: false,
            last_hit_at: None,
            dead: false,
        }
    }

    /// Brings a dead player back at full health if a life remains.
    pub fn respawn(&mut self) -> bool {
        if !self.dead || self.lives == 0 {
            return false;
        }
        self.dead = false;
        self.health = self.max_health;
        self.last_hit_at = None;
        true
    }
}

/// Active boss encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossState {
    pub id: EntityId,
    /// Level the boss guards; recorded in progress once defeated.
    pub level_index: u32,
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub active: bool,
    pub defeated: bool,
    /// Whether the boss health bar and name plate are shown.
    pub ui_visible: bool,
    pub last_hit_at: Option<Timestamp>,
}

impl BossState {
    pub fn new(level_index: u32, position: Position, health: i32) -> Self {
        let health = health.max(1);
        Self {
            id: EntityId::new(format!("boss_{level_index}")),
            level_index,
            position,
            health,
            max_health: health,
            active: true,
            defeated: false,
            ui_visible: true,
            last_hit_at: None,
        }
    }
}
