use std::fmt;

/// Stable identifier for an entity spawned during a match.
///
/// Identifiers are opaque strings agreed on by both peers (`"e1"`,
/// `"coin_drop_3"`). Prefix conventions carry meaning, see [`EntityId::is_drop`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(String);

impl EntityId {
    /// Prefix of coins dropped by defeated enemies. Drop coins fall under gravity.
    pub const DROP_PREFIX: &'static str = "coin_drop_";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier of the `n`-th host-spawned enemy.
    pub fn enemy(n: u32) -> Self {
        Self(format!("e{n}"))
    }

    /// Identifier of the `n`-th host-spawned level coin.
    pub fn coin(n: u32) -> Self {
        Self(format!("coin_{n}"))
    }

    /// Identifier of the `n`-th coin dropped by a defeated enemy.
    pub fn drop_coin(n: u32) -> Self {
        Self(format!("{}{n}", Self::DROP_PREFIX))
    }

    /// Identifier of the `n`-th host-spawned power-up.
    pub fn power_up(n: u32) -> Self {
        Self(format!("powerup_{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for transient, gravity-affected drop coins.
    pub fn is_drop(&self) -> bool {
        self.0.starts_with(Self::DROP_PREFIX)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// World position in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear blend toward `target` by `factor` (0 keeps `self`, 1 reaches `target`).
    pub fn lerp(self, target: Position, factor: f32) -> Position {
        Position {
            x: self.x + (target.x - self.x) * factor,
            y: self.y + (target.y - self.y) * factor,
        }
    }

    /// Advances by `velocity` over `seconds`.
    pub fn step(self, velocity: Velocity, seconds: f32) -> Position {
        Position {
            x: self.x + velocity.x * seconds,
            y: self.y + velocity.y * seconds,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Velocity in pixels per second, applied directly to the local physics body.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Scene time in milliseconds since the session started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: u64) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_prefix_marks_transient_coins() {
        assert!(EntityId::drop_coin(3).is_drop());
        assert_eq!(EntityId::drop_coin(3).as_str(), "coin_drop_3");
        assert!(!EntityId::coin(3).is_drop());
        assert!(!EntityId::enemy(1).is_drop());
    }

    #[test]
    fn lerp_moves_partway() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(10.0, 20.0);
        assert_eq!(from.lerp(to, 0.5), Position::new(5.0, 10.0));
        assert_eq!(from.distance(Position::new(3.0, 4.0)), 5.0);
    }
}
