pub mod actors;
pub mod common;
pub mod entities;
pub mod kinds;
pub mod sprite;

// Re-export common types
pub use common::{EntityId, Position, Timestamp, Velocity};

// Re-export kind enums
pub use kinds::{EnemyKind, EntityKind, PowerUpKind, SpriteTexture};

// Re-export sprite storage
pub use sprite::{Sprite, SpriteFlags, SpriteKey, SpriteStore, Tint};

// Re-export tracked entity records
pub use entities::{CoinRecord, EnemyRecord, PowerUpRecord, TrackedRecord};

// Re-export players and boss
pub use actors::{BossState, PlayerSlot, PlayerState};
