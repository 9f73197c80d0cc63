//! Scene state of one co-op play session.
//!
//! [`SceneState`] owns every sprite, the three entity registries, the seeded
//! RNG and the authority flag. It replaces the scene-wide globals of a typical
//! engine scene: the sync and combat modules receive it by mutable reference
//! and nothing else touches it, so no locking is required.
pub mod registry;
pub mod types;

pub use registry::Registry;
pub use types::{
    BossState, CoinRecord, EnemyKind, EnemyRecord, EntityId, EntityKind, PlayerSlot,
    PlayerState, Position, PowerUpKind, PowerUpRecord, Sprite, SpriteFlags, SpriteKey,
    SpriteStore, SpriteTexture, Timestamp, Tint, TrackedRecord, Velocity,
};

use crate::config::SyncConfig;
use crate::protocol::NetMessage;
use crate::rng::SeededRng;

/// Which peer may originate new entities. Fixed for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Authority {
    /// Spawns entities and broadcasts their state.
    Host,
    /// Mirrors the host's entities.
    Client,
}

impl Authority {
    pub const fn is_host(self) -> bool {
        matches!(self, Authority::Host)
    }

    /// Seat the local player occupies for this authority.
    pub const fn default_slot(self) -> PlayerSlot {
        match self {
            Authority::Host => PlayerSlot::One,
            Authority::Client => PlayerSlot::Two,
        }
    }
}

/// Monotonic counters for host-generated identifiers. Never reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdAllocator {
    enemies: u32,
    coins: u32,
    drops: u32,
    power_ups: u32,
}

impl IdAllocator {
    pub fn next_enemy(&mut self) -> EntityId {
        self.enemies += 1;
        EntityId::enemy(self.enemies)
    }

    pub fn next_coin(&mut self) -> EntityId {
        self.coins += 1;
        EntityId::coin(self.coins)
    }

    pub fn next_drop(&mut self) -> EntityId {
        self.drops += 1;
        EntityId::drop_coin(self.drops)
    }

    pub fn next_power_up(&mut self) -> EntityId {
        self.power_ups += 1;
        EntityId::power_up(self.power_ups)
    }
}

/// Complete state of one scene instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneState {
    pub authority: Authority,
    /// Seat of the player controlled on this peer.
    pub local_slot: PlayerSlot,
    pub config: SyncConfig,
    pub rng: SeededRng,
    /// Scene time of the last frame.
    pub clock: Timestamp,

    pub sprites: SpriteStore,
    pub enemies: Registry<EnemyRecord>,
    pub coins: Registry<CoinRecord>,
    pub power_ups: Registry<PowerUpRecord>,

    pub players: [PlayerState; 2],
    pub boss: Option<BossState>,

    /// Score of the local player.
    pub score: u64,
    /// Coins collected by the local player this session.
    pub coin_purse: u32,

    pub ids: IdAllocator,
    /// Messages waiting to be sent to the remote peer.
    outbox: Vec<NetMessage>,
}

impl SceneState {
    /// Creates an empty scene. The seed must be identical on both peers.
    pub fn new(authority: Authority, config: SyncConfig, seed: u32) -> Self {
        Self {
            authority,
            local_slot: authority.default_slot(),
            config,
            rng: SeededRng::new(seed),
            clock: Timestamp::ZERO,
            sprites: SpriteStore::new(),
            enemies: Registry::new(),
            coins: Registry::new(),
            power_ups: Registry::new(),
            players: [
                PlayerState::new(PlayerSlot::One),
                PlayerState::new(PlayerSlot::Two),
            ],
            boss: None,
            score: 0,
            coin_purse: 0,
            ids: IdAllocator::default(),
            outbox: Vec::new(),
        }
    }

    pub fn host(config: SyncConfig, seed: u32) -> Self {
        Self::new(Authority::Host, config, seed)
    }

    pub fn client(config: SyncConfig, seed: u32) -> Self {
        Self::new(Authority::Client, config, seed)
    }

    pub fn with_local_slot(mut self, slot: PlayerSlot) -> Self {
        self.local_slot = slot;
        self
    }

    pub fn is_host(&self) -> bool {
        self.authority.is_host()
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerState {
        &self.players[slot.index()]
    }

    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut PlayerState {
        &mut self.players[slot.index()]
    }

    /// Queues a message for the remote peer.
    pub fn send(&mut self, message: NetMessage) {
        self.outbox.push(message);
    }

    pub fn pending_outbound(&self) -> &[NetMessage] {
        &self.outbox
    }

    /// Takes every queued outbound message.
    pub fn drain_outbox(&mut self) -> Vec<NetMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Sprite key currently registered for `id`, if any.
    pub fn registered_sprite(&self, kind: EntityKind, id: &EntityId) -> Option<SpriteKey> {
        match kind {
            EntityKind::Enemy => self.enemies.get(id).map(|r| r.sprite),
            EntityKind::Coin => self.coins.get(id).map(|r| r.sprite),
            EntityKind::PowerUp => self.power_ups.get(id).map(|r| r.sprite),
        }
    }

    /// Number of sprites tagged with `id` in `kind`'s group.
    pub fn sprites_tagged(&self, kind: EntityKind, id: &EntityId) -> usize {
        self.sprites.count_tagged(kind, id)
    }

    /// Drops every sprite, record and pending message (scene shutdown/restart).
    pub fn teardown(&mut self) {
        self.sprites.clear();
        self.enemies.clear();
        self.coins.clear();
        self.power_ups.clear();
        self.boss = None;
        self.outbox.clear();
    }
}
