//! Pluggable 64-bit random number generation
//!
//! Workers consume randomness through the narrow [`RandomProvider`] batch
//! contract; the three interchangeable algorithms behind it differ only in
//! throughput, never in correctness of the simulation.
//!
//! # Determinism
//!
//! Every provider is seeded. Same seed → same sequence, which is CRITICAL
//! for reproducing a simulation run exactly.

mod block;
mod splitmix;
mod xorshift;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use block::BlockXorshift;
pub(crate) use splitmix::GOLDEN_GAMMA;
pub use splitmix::{splitmix64, SplitMix64};
pub use xorshift::Xorshift64Star;

/// Errors raised while constructing a random provider
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RngError {
    /// The caller's batch buffer is smaller than the provider's declared
    /// minimum fill size. The owning worker must not generate.
    #[error("batch size {requested} below provider minimum {minimum}")]
    BatchTooSmall { requested: usize, minimum: usize },
}

/// Generation algorithm selector
///
/// Numeric values match the operator-facing algorithm ids 0/1/2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AlgorithmId {
    /// xorshift64* drawing one value at a time
    Sequence = 0,
    /// xorshift64* filling the whole batch per call (default)
    Block = 1,
    /// SplitMix64, standing in for a system-library generator
    System = 2,
}

impl AlgorithmId {
    /// Parse an operator-supplied numeric id
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(AlgorithmId::Sequence),
            1 => Some(AlgorithmId::Block),
            2 => Some(AlgorithmId::System),
            _ => None,
        }
    }

    /// Human-readable algorithm name for summaries and reports
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmId::Sequence => "xorshift64* sequence",
            AlgorithmId::Block => "xorshift64* block",
            AlgorithmId::System => "splitmix64 system",
        }
    }
}

impl Default for AlgorithmId {
    fn default() -> Self {
        AlgorithmId::Block
    }
}

/// Batch contract every generation algorithm implements
///
/// `fill` overwrites the entire buffer with fresh 64-bit values. Buffers
/// shorter than `min_batch_size` are rejected at construction time, so
/// `fill` itself never fails.
pub trait RandomProvider: Send + std::fmt::Debug {
    /// Overwrite `buf` with the next values of the stream
    fn fill(&mut self, buf: &mut [u64]);

    /// Smallest batch the provider will fill (1 unless stated otherwise)
    fn min_batch_size(&self) -> usize {
        1
    }
}

/// Construct the provider for `algorithm`, validating the batch size
///
/// # Errors
///
/// Returns [`RngError::BatchTooSmall`] when `batch_size` is below the
/// algorithm's declared minimum.
///
/// # Example
/// ```
/// use randsim_core::rng::{build_provider, AlgorithmId};
///
/// let mut provider = build_provider(AlgorithmId::Sequence, 12345, 64).unwrap();
/// let mut batch = [0u64; 64];
/// provider.fill(&mut batch);
/// ```
pub fn build_provider(
    algorithm: AlgorithmId,
    seed: u64,
    batch_size: usize,
) -> Result<Box<dyn RandomProvider>, RngError> {
    let provider: Box<dyn RandomProvider> = match algorithm {
        AlgorithmId::Sequence => Box::new(Xorshift64Star::new(seed)),
        AlgorithmId::Block => Box::new(BlockXorshift::new(seed)),
        AlgorithmId::System => Box::new(SplitMix64::new(seed)),
    };
    let minimum = provider.min_batch_size();
    if batch_size < minimum {
        return Err(RngError::BatchTooSmall {
            requested: batch_size,
            minimum,
        });
    }
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_round_trip() {
        for id in 0u8..3 {
            let algo = AlgorithmId::from_id(id).unwrap();
            assert_eq!(algo as u8, id);
        }
        assert_eq!(AlgorithmId::from_id(3), None);
    }

    #[test]
    fn test_build_provider_rejects_small_batch() {
        let err = build_provider(AlgorithmId::Block, 1, 16).unwrap_err();
        assert_eq!(
            err,
            RngError::BatchTooSmall {
                requested: 16,
                minimum: BlockXorshift::MIN_BATCH_SIZE,
            }
        );
    }

    #[test]
    fn test_build_provider_sequence_accepts_single_value_batch() {
        assert!(build_provider(AlgorithmId::Sequence, 1, 1).is_ok());
        assert!(build_provider(AlgorithmId::System, 1, 1).is_ok());
    }
}
