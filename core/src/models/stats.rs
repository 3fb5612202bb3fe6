//! Process-wide generation statistics
//!
//! One `GlobalStats` instance is shared by every worker and the
//! coordinator. The mutex that guards the generated-count also serializes
//! match emission onto the shared result channel, so a count update and a
//! match report from different workers can never interleave.

use std::sync::Mutex;

use crate::channel::{ChannelError, ResultSender};
use crate::models::MatchEvent;

/// Shared counters for a session
#[derive(Debug, Default)]
pub struct GlobalStats {
    /// Total 64-bit values generated across all workers. Monotonically
    /// increasing; every addition must be observed (no lost updates).
    generated: Mutex<u64>,
}

impl GlobalStats {
    /// Create zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one finished batch's value count
    pub fn add_generated(&self, count: u64) {
        let mut generated = self.lock_generated();
        *generated += count;
    }

    /// Total values generated so far
    pub fn generated(&self) -> u64 {
        *self.lock_generated()
    }

    /// Send a match event while holding the statistics lock
    ///
    /// # Errors
    ///
    /// [`ChannelError::SendDisconnected`] when the coordinator side is
    /// gone; the calling worker treats that as fatal and exits its loop.
    pub fn emit_match(
        &self,
        sender: &ResultSender,
        event: MatchEvent,
    ) -> Result<(), ChannelError> {
        let _guard = self.lock_generated();
        sender.send(event)
    }

    fn lock_generated(&self) -> std::sync::MutexGuard<'_, u64> {
        // A worker panicking mid-update leaves a valid u64 behind, so a
        // poisoned lock is still safe to read.
        self.generated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_generated_accumulates() {
        let stats = GlobalStats::new();
        stats.add_generated(100);
        stats.add_generated(28);
        assert_eq!(stats.generated(), 128);
    }
}
