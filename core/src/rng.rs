//! Deterministic RNG for card shuffling and decorative rotation
//!
//! Hosts seed the generator (the browser client uses `getrandom`), so tests
//! and replays can reproduce a deal exactly.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// Trait for random number generation in the card game
pub trait ShuffleRng {
    /// Generate a random u32
    fn next_u32(&mut self) -> u32;

    /// Generate a random number in [0, 1)
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Pick a pivot in [0, remaining) as `floor(random * remaining)`
    fn pick(&mut self, remaining: usize) -> usize {
        if remaining == 0 {
            return 0;
        }
        let n = (self.next_f64() * remaining as f64).floor() as usize;
        n.min(remaining - 1)
    }

    /// Drain `items` into a new vector, taking one random element per step
    fn shuffle_into<T>(&mut self, mut items: Vec<T>) -> Vec<T> {
        let mut out = Vec::with_capacity(items.len());
        while !items.is_empty() {
            let n = self.pick(items.len());
            out.push(items.remove(n));
        }
        out
    }

    /// Random value in [-max, max)
    fn signed_unit(&mut self, max: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * max
    }
}

/// XorShift32 RNG - simple, fast, deterministic
///
/// The same seed will always produce the same sequence.
#[derive(Debug, Clone, Encode, Decode, TypeInfo)]
pub struct XorShiftRng {
    state: u32,
}

impl XorShiftRng {
    /// Create a new RNG from a u64 seed
    ///
    /// The seed is combined into a u32, ensuring state is never 0.
    pub fn seed_from_u64(seed: u64) -> Self {
        let state = ((seed as u32) ^ ((seed >> 32) as u32)).max(1);
        Self { state }
    }

    /// Create a new RNG from a u32 seed
    pub fn seed_from_u32(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }
}

impl ShuffleRng for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
