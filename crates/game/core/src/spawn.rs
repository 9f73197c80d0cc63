//! Spawn authority: who may create an entity, and how duplicates are avoided.
//!
//! The host may always spawn. Entities it creates without an identifier get a
//! fresh one and are announced to the remote peer through the scene outbox.
//!
//! A client never originates untracked entities: requests without an
//! identifier are rejected. With an identifier, the client first reuses what it
//! already has (a registered record, or a local sprite tagged with the same
//! identifier from seeded pre-generation) and only creates a sprite when
//! neither exists.

use strum::IntoEnumIterator;

use crate::error::{ErrorSeverity, GameError};
use crate::protocol::{CoinState, EnemyState, NetMessage, PowerUpState};
use crate::state::{
    CoinRecord, EnemyKind, EnemyRecord, EntityId, EntityKind, Position, PowerUpKind,
    PowerUpRecord, SceneState, SpriteKey, SpriteTexture,
};

/// What to spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnSpec {
    Enemy { kind: EnemyKind, health: Option<i32> },
    Coin { value: u32, drop: bool },
    PowerUp { kind: PowerUpKind },
}

impl SpawnSpec {
    pub const fn entity_kind(&self) -> EntityKind {
        match self {
            SpawnSpec::Enemy { .. } => EntityKind::Enemy,
            SpawnSpec::Coin { .. } => EntityKind::Coin,
            SpawnSpec::PowerUp { .. } => EntityKind::PowerUp,
        }
    }

    const fn texture(&self) -> SpriteTexture {
        match *self {
            SpawnSpec::Enemy { kind, .. } => SpriteTexture::Enemy(kind),
            SpawnSpec::Coin { drop: true, .. } => SpriteTexture::DropCoin,
            SpawnSpec::Coin { drop: false, .. } => SpriteTexture::Coin,
            SpawnSpec::PowerUp { kind } => SpriteTexture::PowerUp(kind),
        }
    }
}

/// Request to bring an entity into the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    /// `None` for ambient/respawn spawns; only the host may issue those.
    pub id: Option<EntityId>,
    pub position: Position,
    pub spec: SpawnSpec,
}

impl SpawnRequest {
    pub fn enemy(kind: EnemyKind, position: Position) -> Self {
        Self {
            id: None,
            position,
            spec: SpawnSpec::Enemy { kind, health: None },
        }
    }

    pub fn coin(value: u32, position: Position) -> Self {
        Self {
            id: None,
            position,
            spec: SpawnSpec::Coin { value, drop: false },
        }
    }

    pub fn drop_coin(value: u32, position: Position) -> Self {
        Self {
            id: None,
            position,
            spec: SpawnSpec::Coin { value, drop: true },
        }
    }

    pub fn power_up(kind: PowerUpKind, position: Position) -> Self {
        Self {
            id: None,
            position,
            spec: SpawnSpec::PowerUp { kind },
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        let id = id.into();
        if let SpawnSpec::Coin { drop, .. } = &mut self.spec {
            *drop = *drop || id.is_drop();
        }
        self.id = Some(id);
        self
    }

    pub fn with_health(mut self, value: i32) -> Self {
        if let SpawnSpec::Enemy { health, .. } = &mut self.spec {
            *health = Some(value);
        }
        self
    }
}

/// How a spawn request was satisfied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// A new sprite was created and registered.
    Created { id: EntityId, sprite: SpriteKey },
    /// A locally tagged sprite was registered; no sprite was created.
    Adopted { id: EntityId, sprite: SpriteKey },
    /// The identifier was already registered; nothing was duplicated.
    Existing { id: EntityId, sprite: SpriteKey },
}

impl SpawnOutcome {
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Created { id, .. } | Self::Adopted { id, .. } | Self::Existing { id, .. } => id,
        }
    }

    pub fn sprite(&self) -> SpriteKey {
        match self {
            Self::Created { sprite, .. }
            | Self::Adopted { sprite, .. }
            | Self::Existing { sprite, .. } => *sprite,
        }
    }

    /// True when this spawn registered a new record.
    pub fn is_new(&self) -> bool {
        !matches!(self, Self::Existing { .. })
    }
}

/// Rejected spawn requests.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("client cannot originate an untracked {kind} spawn")]
    MissingIdentifier { kind: EntityKind },
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingIdentifier { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingIdentifier { .. } => "SPAWN_MISSING_IDENTIFIER",
        }
    }
}

/// Spawns, adopts or reuses an entity according to the scene's authority.
///
/// The host announces every newly registered entity to the remote peer.
pub fn try_spawn(scene: &mut SceneState, request: SpawnRequest) -> Result<SpawnOutcome, SpawnError> {
    let kind = request.spec.entity_kind();

    let id = match request.id {
        Some(id) => id,
        None if scene.is_host() => match request.spec {
            SpawnSpec::Enemy { .. } => scene.ids.next_enemy(),
            SpawnSpec::Coin { drop: true, .. } => scene.ids.next_drop(),
            SpawnSpec::Coin { drop: false, .. } => scene.ids.next_coin(),
            SpawnSpec::PowerUp { .. } => scene.ids.next_power_up(),
        },
        None => return Err(SpawnError::MissingIdentifier { kind }),
    };

    if let Some(sprite) = scene.registered_sprite(kind, &id) {
        if let Some(s) = scene.sprites.get_mut(sprite) {
            s.bind(&id);
        }
        return Ok(SpawnOutcome::Existing { id, sprite });
    }

    let texture = request.spec.texture();
    let outcome = match scene.sprites.find_tagged(kind, &id) {
        Some(sprite) => {
            if let Some(s) = scene.sprites.get_mut(sprite) {
                s.bind(&id);
                s.texture = texture;
            }
            SpawnOutcome::Adopted {
                id: id.clone(),
                sprite,
            }
        }
        None => {
            let sprite = scene
                .sprites
                .create(texture, request.position, Some(id.clone()));
            SpawnOutcome::Created {
                id: id.clone(),
                sprite,
            }
        }
    };

    let sprite = outcome.sprite();
    let position = scene
        .sprites
        .get(sprite)
        .map_or(request.position, |s| s.position);

    register(scene, &id, sprite, position, request.spec);
    if scene.is_host() {
        announce(scene, kind, &id);
    }

    Ok(outcome)
}

fn register(
    scene: &mut SceneState,
    id: &EntityId,
    sprite: SpriteKey,
    position: Position,
    spec: SpawnSpec,
) {
    match spec {
        SpawnSpec::Enemy { kind, health } => {
            let mut record = EnemyRecord::new(id.clone(), sprite, kind, position);
            if let Some(health) = health {
                record = record.with_health(health, health.max(kind.base_health()));
            }
            scene.enemies.insert(record);
        }
        SpawnSpec::Coin { value, .. } => {
            scene
                .coins
                .insert(CoinRecord::new(id.clone(), sprite, position, value));
        }
        SpawnSpec::PowerUp { kind } => {
            scene
                .power_ups
                .insert(PowerUpRecord::new(id.clone(), sprite, kind, position));
        }
    }
}

/// Queues the current state of a registered entity for the remote peer.
pub(crate) fn announce(scene: &mut SceneState, kind: EntityKind, id: &EntityId) {
    let message = match kind {
        EntityKind::Enemy => scene
            .enemies
            .get(id)
            .map(|r| NetMessage::EnemyState(EnemyState::from_record(r))),
        EntityKind::Coin => scene
            .coins
            .get(id)
            .map(|r| NetMessage::CoinState(CoinState::from_record(r))),
        EntityKind::PowerUp => scene
            .power_ups
            .get(id)
            .map(|r| NetMessage::PowerUpState(PowerUpState::from_record(r))),
    };
    if let Some(message) = message {
        scene.send(message);
    }
}

/// Rectangle procedural placement draws positions from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelBounds {
    pub min: Position,
    pub max: Position,
}

impl LevelBounds {
    pub const fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }
}

/// Seeded procedural placement of a level's enemies and coins.
///
/// Both peers call this with the same seed and arguments and draw identical
/// identifiers, species and positions. The host registers and announces the
/// results. The client only creates tagged sprites; they are adopted when the
/// host's messages arrive, or garbage-collected by the next full sync if the
/// host never spawned them.
pub fn populate_level(
    scene: &mut SceneState,
    enemies: u32,
    coins: u32,
    bounds: LevelBounds,
) -> Vec<EntityId> {
    let species: Vec<EnemyKind> = EnemyKind::iter().collect();
    let mut placed = Vec::with_capacity((enemies + coins) as usize);

    for _ in 0..enemies {
        let id = scene.ids.next_enemy();
        let position = draw_position(scene, bounds);
        let kind = scene.rng.pick(&species).copied().unwrap_or_default();
        place(scene, SpawnRequest::enemy(kind, position).with_id(id.clone()));
        placed.push(id);
    }

    for _ in 0..coins {
        let id = scene.ids.next_coin();
        let position = draw_position(scene, bounds);
        let value = scene.rng.between(1, 3) as u32;
        place(scene, SpawnRequest::coin(value, position).with_id(id.clone()));
        placed.push(id);
    }

    placed
}

fn draw_position(scene: &mut SceneState, bounds: LevelBounds) -> Position {
    let x = scene.rng.range_f32(bounds.min.x, bounds.max.x);
    let y = scene.rng.range_f32(bounds.min.y, bounds.max.y);
    Position::new(x, y)
}

fn place(scene: &mut SceneState, request: SpawnRequest) {
    if scene.is_host() {
        let placed = try_spawn(scene, request);
        debug_assert!(placed.is_ok(), "host placement rejected: {placed:?}");
        return;
    }
    let kind = request.spec.entity_kind();
    if let Some(id) = &request.id
        && scene.sprites.find_tagged(kind, id).is_none()
    {
        scene
            .sprites
            .create(request.spec.texture(), request.position, Some(id.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;

    fn bounds() -> LevelBounds {
        LevelBounds::new(Position::new(0.0, 0.0), Position::new(800.0, 400.0))
    }

    #[test]
    fn client_rejects_spawns_without_identifier() {
        let mut scene = SceneState::client(SyncConfig::default(), 1);

        let result = try_spawn(
            &mut scene,
            SpawnRequest::enemy(EnemyKind::Bat, Position::new(10.0, 10.0)),
        );

        assert_eq!(
            result,
            Err(SpawnError::MissingIdentifier {
                kind: EntityKind::Enemy
            })
        );
        assert!(scene.sprites.is_empty());
        assert!(scene.enemies.is_empty());
    }

    #[test]
    fn host_assigns_identifiers_and_announces() {
        let mut scene = SceneState::host(SyncConfig::default(), 1);

        let first = try_spawn(&mut scene, SpawnRequest::enemy(EnemyKind::Slime, Position::ORIGIN))
            .unwrap();
        let drop = try_spawn(&mut scene, SpawnRequest::drop_coin(2, Position::ORIGIN)).unwrap();

        assert_eq!(first.id().as_str(), "e1");
        assert!(drop.id().is_drop());
        assert_eq!(scene.pending_outbound().len(), 2);
        assert!(matches!(
            scene.pending_outbound()[0],
            NetMessage::EnemyState(ref s) if s.enemy_id.as_str() == "e1"
        ));
    }

    #[test]
    fn client_adopts_pre_generated_sprite() {
        let mut scene = SceneState::client(SyncConfig::default(), 1);
        let id = EntityId::new("e1");
        let local = scene.sprites.create(
            SpriteTexture::Enemy(EnemyKind::Slime),
            Position::new(40.0, 40.0),
            Some(id.clone()),
        );

        let outcome = try_spawn(
            &mut scene,
            SpawnRequest::enemy(EnemyKind::Slime, Position::new(45.0, 40.0)).with_id(id.clone()),
        )
        .unwrap();

        assert_eq!(
            outcome,
            SpawnOutcome::Adopted {
                id: id.clone(),
                sprite: local
            }
        );
        assert_eq!(scene.sprites.len(), 1);
        assert_eq!(scene.enemies.get(&id).map(|r| r.sprite), Some(local));
    }

    #[test]
    fn second_spawn_for_same_identifier_reuses_record() {
        let mut scene = SceneState::client(SyncConfig::default(), 1);
        let request = SpawnRequest::coin(1, Position::ORIGIN).with_id("coin_9");

        let first = try_spawn(&mut scene, request.clone()).unwrap();
        let second = try_spawn(&mut scene, request).unwrap();

        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.sprite(), second.sprite());
        assert_eq!(scene.sprites.len(), 1);
        assert_eq!(scene.coins.len(), 1);
    }

    #[test]
    fn both_peers_generate_the_same_level() {
        let mut host = SceneState::host(SyncConfig::default(), 77);
        let mut client = SceneState::client(SyncConfig::default(), 77);

        let host_ids = populate_level(&mut host, 4, 3, bounds());
        let client_ids = populate_level(&mut client, 4, 3, bounds());

        assert_eq!(host_ids, client_ids);
        assert_eq!(host.enemies.len(), 4);
        assert_eq!(host.coins.len(), 3);
        // Client sprites exist but wait for adoption.
        assert!(client.enemies.is_empty());
        assert_eq!(client.sprites.len(), 7);

        for id in host.enemies.ids() {
            let host_pos = host.enemies.get(id).unwrap().position;
            let key = client.sprites.find_tagged(EntityKind::Enemy, id).unwrap();
            assert_eq!(client.sprites.get(key).unwrap().position, host_pos);
        }
    }

    #[test]
    fn drop_prefixed_identifier_spawns_gravity_coin() {
        let mut scene = SceneState::client(SyncConfig::default(), 1);
        let outcome =
            try_spawn(&mut scene, SpawnRequest::coin(1, Position::ORIGIN).with_id("coin_drop_4"))
                .unwrap();
        let sprite = scene.sprites.get(outcome.sprite()).unwrap();
        assert_eq!(sprite.texture, SpriteTexture::DropCoin);
    }
}
