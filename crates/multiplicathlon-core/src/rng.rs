//! Random number generator abstraction for determinism.
//!
//! Quiz generation never reaches for a global random source. Every sampling
//! function takes a `&mut dyn DeterministicRng`; production code injects a
//! [`StdDeterministicRng`], tests inject a seeded or scripted implementation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

/// Production RNG backed by `rand`'s `StdRng`.
#[derive(Debug, Clone)]
pub struct StdDeterministicRng {
    inner: StdRng,
}

impl StdDeterministicRng {
    /// Creates a reproducible generator from a seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }
}

impl DeterministicRng for StdDeterministicRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }
}

/// Returns an integer in `[0, bound)`.
///
/// A zero bound has no valid value; it is clamped to `0` and logged.
pub fn random_int(rng: &mut dyn DeterministicRng, bound: u32) -> u32 {
    if bound == 0 {
        warn!("random_int called with an empty bound, clamping to 0");
        return 0;
    }
    rng.next_u32_range(0, bound - 1)
}

/// Returns an integer in the half-open range `[start, end)`.
///
/// An empty or inverted range (`end <= start`) is clamped to `start` and
/// logged instead of producing a meaningless value.
pub fn random_int_in_range(rng: &mut dyn DeterministicRng, start: i64, end: i64) -> i64 {
    if end <= start {
        warn!(start, end, "degenerate range, clamping to start");
        return start;
    }
    let span_max = u32::try_from(end - start - 1).unwrap_or(u32::MAX);
    start + i64::from(rng.next_u32_range(0, span_max))
}

/// Picks one element uniformly, or `None` for an empty slice.
///
/// A single-element slice is returned without consuming a draw.
pub fn pick<'a, T>(rng: &mut dyn DeterministicRng, items: &'a [T]) -> Option<&'a T> {
    match items.len() {
        0 => None,
        1 => items.first(),
        len => {
            let bound = u32::try_from(len).unwrap_or(u32::MAX);
            items.get(random_int(rng, bound) as usize)
        }
    }
}

/// Shuffles `items` in place (Fisher–Yates).
pub fn shuffle<T>(rng: &mut dyn DeterministicRng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let upper = u32::try_from(i).unwrap_or(u32::MAX);
        let j = rng.next_u32_range(0, upper) as usize;
        items.swap(i, j.min(i));
    }
}
