//! Seeded deterministic random numbers shared by both peers.
//!
//! Procedural choices that are never sent over the wire (where a decorative
//! enemy stands, which species it is) are drawn from this generator. Both
//! peers start from the same seed, so the same call order yields the same
//! outcomes. A peer that skips a draw desyncs only cosmetically: positions,
//! health and alive flags are always overwritten by authoritative messages.
//!
//! # Determinism
//!
//! The generator is a plain linear congruential step:
//!
//! ```text
//! state' = (state × 9301 + 49297) mod 233280
//! value  = state' / 233280
//! ```
//!
//! Every state is reduced modulo [`MODULUS`], so any `u32` is a valid seed.

/// LCG multiplier.
pub const MULTIPLIER: u32 = 9301;
/// LCG increment.
pub const INCREMENT: u32 = 49297;
/// LCG modulus. Outputs are `state / MODULUS`, so they lie in `[0, 1)`.
pub const MODULUS: u32 = 233_280;

/// Advances `state` and returns a float in `[0, 1)` with the new state.
#[inline]
pub fn seeded_random(state: u32) -> (f64, u32) {
    let scaled = (state % MODULUS) as u64 * MULTIPLIER as u64 + INCREMENT as u64;
    let next = (scaled % MODULUS as u64) as u32;
    (next as f64 / MODULUS as f64, next)
}

/// Draws an integer in `[min, max]` (inclusive) and returns it with the new state.
///
/// Bounds given in the wrong order are swapped.
pub fn seeded_between(state: u32, min: i32, max: i32) -> (i32, u32) {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let (value, next) = seeded_random(state);
    let span = (hi as i64 - lo as i64 + 1) as f64;
    let drawn = lo as i64 + (value * span).floor() as i64;
    (drawn.min(hi as i64) as i32, next)
}

/// Stateful wrapper for sequential draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current state; feeding it to [`SeededRng::new`] resumes the sequence.
    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next_f64(&mut self) -> f64 {
        let (value, next) = seeded_random(self.state);
        self.state = next;
        value
    }

    pub fn between(&mut self, min: i32, max: i32) -> i32 {
        let (value, next) = seeded_between(self.state, min, max);
        self.state = next;
        value
    }

    /// Float in `[min, max)`.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f64() as f32
    }

    /// Picks one element. Always draws, even for single-element slices, so the
    /// call order stays identical across peers.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let value = self.next_f64();
        if items.is_empty() {
            return None;
        }
        let index = ((value * items.len() as f64) as usize).min(items.len() - 1);
        items.get(index)
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_between() {
        let (first, state_a) = seeded_between(42, 10, 20);
        let (second, state_b) = seeded_between(42, 10, 20);
        assert_eq!(first, second);
        assert_eq!(state_a, state_b);
        assert!((10..=20).contains(&first));
    }

    #[test]
    fn first_step_from_seed_42() {
        // (42 × 9301 + 49297) mod 233280 = 439 939 mod 233280 = 206 659
        let (value, state) = seeded_random(42);
        assert_eq!(state, 206_659);
        assert!((value - 206_659.0 / 233_280.0).abs() < f64::EPSILON);
    }

    #[test]
    fn outputs_stay_in_unit_interval() {
        let mut state = 7;
        for _ in 0..10_000 {
            let (value, next) = seeded_random(state);
            assert!((0.0..1.0).contains(&value));
            state = next;
        }
    }

    #[test]
    fn two_peers_draw_identical_sequences() {
        let mut host = SeededRng::new(1234);
        let mut client = SeededRng::new(1234);
        for _ in 0..100 {
            assert_eq!(host.between(-5, 5), client.between(-5, 5));
            assert_eq!(host.next_f64(), client.next_f64());
        }
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let (value, _) = seeded_between(99, 20, 10);
        assert!((10..=20).contains(&value));
    }

    #[test]
    fn pick_draws_even_for_empty_slices() {
        let mut rng = SeededRng::new(5);
        let before = rng.state();
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert_ne!(rng.state(), before);
    }
}
