//! Core environment context trait for the Schelling engine.

/// The random source the step engine draws from.
///
/// # Implementations
///
/// - **Production**: `EntropyContext` - wraps `rand::thread_rng`
/// - **Deterministic**: `SeededContext` - wraps `ChaCha8Rng(seed)`
///
/// # Draw order
///
/// For a reproducible run the engine consumes draws in a fixed order:
/// one `shuffle` of the unhappy list per step, then one `pick_index`
/// per relocated agent, in shuffled order.
pub trait SchellingContext {
    /// Returns the context's seed (for logging/debugging).
    ///
    /// Unseeded contexts return 0.
    fn seed(&self) -> u64;

    /// Returns an index drawn uniformly from `0..len`.
    ///
    /// # Panics
    /// Panics if `len` is zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Shuffles `items` into a uniformly random permutation.
    fn shuffle<T>(&mut self, items: &mut [T]);
}
