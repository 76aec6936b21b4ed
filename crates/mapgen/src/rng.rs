//! Seeded pseudo-random streams with deterministic named forks.
//!
//! A stream is derived entirely from its seed string: the string is hashed with xxh3
//! and the digest seeds a ChaCha8 generator. Forking hashes `"{seed}::{name}"`, so a
//! fork depends only on the parent's seed and the fork name, never on how many values
//! the parent has already produced.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use xxhash_rust::xxh3::xxh3_64;

const UNIT_SCALE: f64 = 1.0 / (1_u64 << 53) as f64;

#[derive(Clone, Debug)]
pub struct SeededRng {
    seed: String,
    stream: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self { seed: seed.to_owned(), stream: ChaCha8Rng::seed_from_u64(xxh3_64(seed.as_bytes())) }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.stream.next_u64() >> 11) as f64 * UNIT_SCALE
    }

    /// Uniform integer in the inclusive range spanned by `min` and `max`, in either order.
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        if high == low {
            return low;
        }
        let span = i64::from(high) - i64::from(low) + 1;
        let offset = (self.next_f64() * span as f64) as i64;
        (i64::from(low) + offset.min(span - 1)) as i32
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        let roll = self.next_f64();
        if probability.is_nan() {
            return false;
        }
        roll < probability.clamp(0.0, 1.0)
    }

    /// Returns `None` only for an empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let index = self.int(0, items.len() as i32 - 1) as usize;
        Some(items[index])
    }

    /// Fisher-Yates from the back, in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_index = self.int(0, index as i32) as usize;
            items.swap(index, swap_index);
        }
    }

    pub fn fork(&self, name: &str) -> Self {
        Self::new(&format!("{}::{}", self.seed, name))
    }
}
