//! Control and result protocol messages
//!
//! Two message families flow through the channels: commands addressed to
//! workers (start generating / quit) and match events reported back to the
//! coordinator when a rare value turns up.

use serde::{Deserialize, Serialize};

use crate::rng::AlgorithmId;

/// Command sent from the coordinator to a worker over its control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Begin generating with the given algorithm
    Start(AlgorithmId),
    /// Terminate the worker thread
    Quit,
}

/// Which rare bit pattern a generated value matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    /// Upper 32 bits all zero (0x00000000)
    ZeroLeading,
    /// Upper 32 bits all one (0xFFFFFFFF)
    OneLeading,
}

impl MatchKind {
    /// Classify a generated value, if it matches either pattern
    ///
    /// The two patterns are mutually exclusive per value; anything else
    /// yields `None`.
    ///
    /// # Example
    /// ```
    /// use randsim_core::models::MatchKind;
    ///
    /// assert_eq!(MatchKind::classify(0x00000000_DEADBEEF), Some(MatchKind::ZeroLeading));
    /// assert_eq!(MatchKind::classify(0xFFFFFFFF_00000001), Some(MatchKind::OneLeading));
    /// assert_eq!(MatchKind::classify(0x00000001_00000000), None);
    /// ```
    pub fn classify(value: u64) -> Option<MatchKind> {
        match (value >> 32) as u32 {
            0 => Some(MatchKind::ZeroLeading),
            u32::MAX => Some(MatchKind::OneLeading),
            _ => None,
        }
    }
}

/// Match report sent from a worker to the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Pattern the value matched
    pub kind: MatchKind,
    /// Batches elapsed since the previous match of this kind on the
    /// reporting worker (the interval measure fed into the histogram)
    pub elapsed_batches: u64,
    /// The full 64-bit matched value
    pub value: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        // Largest value still zero-leading
        assert_eq!(
            MatchKind::classify(0x00000000_FFFFFFFF),
            Some(MatchKind::ZeroLeading)
        );
        // Smallest value that is neither
        assert_eq!(MatchKind::classify(0x00000001_00000000), None);
        // Smallest one-leading value
        assert_eq!(
            MatchKind::classify(0xFFFFFFFF_00000000),
            Some(MatchKind::OneLeading)
        );
        assert_eq!(MatchKind::classify(u64::MAX), Some(MatchKind::OneLeading));
        assert_eq!(MatchKind::classify(0), Some(MatchKind::ZeroLeading));
    }
}
