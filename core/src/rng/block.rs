//! Block-fill xorshift64* variant
//!
//! Mirrors the block-array generation mode of SIMD generators: the whole
//! batch buffer is produced in one tight pass, and the provider declares a
//! minimum array size below which block generation is not supported.

use serde::{Deserialize, Serialize};

use super::{RandomProvider, Xorshift64Star};

/// Block-mode xorshift64* provider — the `Block` algorithm variant
///
/// Same stream as [`Xorshift64Star`] for a given seed; the difference is
/// the fill discipline and the minimum batch constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockXorshift {
    inner: Xorshift64Star,
}

impl BlockXorshift {
    /// Smallest batch the block fill supports
    pub const MIN_BATCH_SIZE: usize = 512;

    /// Create a new block-mode generator with given seed
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Xorshift64Star::new(seed),
        }
    }
}

impl RandomProvider for BlockXorshift {
    fn fill(&mut self, buf: &mut [u64]) {
        debug_assert!(buf.len() >= Self::MIN_BATCH_SIZE);
        self.inner.fill(buf);
    }

    fn min_batch_size(&self) -> usize {
        Self::MIN_BATCH_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_stream_matches_sequence_stream() {
        let mut block = BlockXorshift::new(4242);
        let mut seq = Xorshift64Star::new(4242);

        let mut batch = vec![0u64; BlockXorshift::MIN_BATCH_SIZE];
        block.fill(&mut batch);
        for value in batch {
            assert_eq!(value, seq.next());
        }
    }

    #[test]
    fn test_declares_minimum_batch() {
        let block = BlockXorshift::new(1);
        assert_eq!(block.min_batch_size(), BlockXorshift::MIN_BATCH_SIZE);
    }
}
