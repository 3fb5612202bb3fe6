//! Interval histogram and bucket quantization
//!
//! Each match carries the number of batches elapsed since the previous
//! match of the same kind on that worker. The coordinator quantizes that
//! interval into one of 256 buckets and accumulates occurrence counts,
//! one histogram per pattern kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference network size the bucket scale was calibrated against
pub const NETWORK_NODES: u64 = 8_388_608;

/// Exponent of the calibration network size (2^24 ≈ NETWORK_NODES * 2)
pub const REFERENCE_EXPONENT: u32 = 24;

/// Experimental scaling exponent paired with [`NETWORK_NODES`]
pub const SCALING_EXPONENT: u32 = 16;

/// Default right-shift applied to an interval before clamping to 256
/// buckets.
///
/// The value is experimental and tied to the fixed [`NETWORK_NODES`]
/// calibration constant, not to the operator-configurable thread or
/// target parameters; it is exposed as a parameter of [`Histogram`] and
/// of the session config rather than hardcoded at the use sites.
pub const INTERVAL_SHIFT: u32 = REFERENCE_EXPONENT - SCALING_EXPONENT;

/// Quantize an elapsed-batch interval into a bucket index in [0, 255]
///
/// An interval whose high 32 bits are nonzero saturates before shifting;
/// the shifted value then clamps to bucket 255.
///
/// # Example
/// ```
/// use randsim_core::models::{interval_bucket, INTERVAL_SHIFT};
///
/// assert_eq!(interval_bucket(0, INTERVAL_SHIFT), 0);
/// assert_eq!(interval_bucket(256, INTERVAL_SHIFT), 1);
/// assert_eq!(interval_bucket(0xFFFF_FFFF, INTERVAL_SHIFT), 255);
/// assert_eq!(interval_bucket(u64::MAX, INTERVAL_SHIFT), 255);
/// ```
pub fn interval_bucket(elapsed_batches: u64, shift: u32) -> u32 {
    let raw = if elapsed_batches >> 32 != 0 {
        u32::MAX
    } else {
        elapsed_batches as u32
    };
    (raw >> shift).min(255)
}

/// Occurrence histogram over interval buckets
///
/// Entries are created on first occurrence; iteration is in ascending
/// bucket order, which is all the final report requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    shift: u32,
    buckets: BTreeMap<u32, u32>,
}

impl Histogram {
    /// Create an empty histogram with the default interval shift
    pub fn new() -> Self {
        Self::with_shift(INTERVAL_SHIFT)
    }

    /// Create an empty histogram with an explicit interval shift
    pub fn with_shift(shift: u32) -> Self {
        Self {
            shift,
            buckets: BTreeMap::new(),
        }
    }

    /// Record one match with the given elapsed-batch interval
    ///
    /// Returns the bucket the interval landed in.
    pub fn record(&mut self, elapsed_batches: u64) -> u32 {
        let bucket = interval_bucket(elapsed_batches, self.shift);
        *self.buckets.entry(bucket).or_insert(0) += 1;
        bucket
    }

    /// Total occurrences recorded
    pub fn total(&self) -> u64 {
        self.buckets.values().map(|&n| u64::from(n)).sum()
    }

    /// Number of distinct buckets with at least one occurrence
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterate `(bucket, count)` pairs in ascending bucket order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.buckets.iter().map(|(&bucket, &count)| (bucket, count))
    }

    /// Drop all recorded occurrences
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}
