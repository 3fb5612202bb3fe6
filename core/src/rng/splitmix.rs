//! SplitMix64 generator and seed scrambler
//!
//! SplitMix64 advances a counter by a fixed odd constant and mixes it, so
//! unlike xorshift it has no forbidden zero state. It doubles as the seed
//! scrambler: per-worker seeds and entropy seeds go through [`splitmix64`]
//! to decorrelate nearby inputs.

use serde::{Deserialize, Serialize};

use super::RandomProvider;

/// Golden-ratio increment of the SplitMix64 stream
pub(crate) const GOLDEN_GAMMA: u64 = 0x9E3779B97F4A7C15;

/// Advance a SplitMix64 state and return the next output
///
/// # Example
/// ```
/// use randsim_core::rng::splitmix64;
///
/// let mut state = 42u64;
/// let a = splitmix64(&mut state);
/// let b = splitmix64(&mut state);
/// assert_ne!(a, b);
/// ```
pub fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(GOLDEN_GAMMA);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// SplitMix64 provider — the `System` algorithm variant
///
/// Stands in for a system-library generator: simpler stream structure than
/// xorshift64*, statistically sound for this simulation's purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Create a new generator from any 64-bit seed (zero is fine)
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RandomProvider for SplitMix64 {
    fn fill(&mut self, buf: &mut [u64]) {
        for slot in buf.iter_mut() {
            *slot = splitmix64(&mut self.state);
        }
    }
}
