//! Production implementation of SchellingContext using OS entropy.

use crate::SchellingContext;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Production context backed by the thread-local OS-seeded RNG.
///
/// Runs are not reproducible; use `SeededContext` for that.
pub struct EntropyContext {
    rng: ThreadRng,
}

impl EntropyContext {
    /// Creates a new EntropyContext.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for EntropyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SchellingContext for EntropyContext {
    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
