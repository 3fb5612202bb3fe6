//! Shared control word between coordinator and workers
//!
//! Single writer (the coordinator), many readers (the workers). Workers
//! poll the word between batches instead of blocking on it, which bounds
//! shutdown latency to one batch-generation duration.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Control instruction governing worker generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Instruction {
    /// Initial state: workers idle, waiting for a start command
    Wait = 0,
    /// Workers actively generating batches
    Start = 1,
    /// Workers must leave the generation loop
    Stop = 2,
    /// Reserved, currently unused
    Pause = 3,
}

impl Instruction {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Instruction::Start,
            2 => Instruction::Stop,
            3 => Instruction::Pause,
            _ => Instruction::Wait,
        }
    }
}

/// Lock-free cell holding the shared [`Instruction`]
///
/// # Example
/// ```
/// use randsim_core::models::{Instruction, InstructionCell};
///
/// let cell = InstructionCell::new();
/// assert_eq!(cell.get(), Instruction::Wait);
/// cell.set(Instruction::Start);
/// assert_eq!(cell.get(), Instruction::Start);
/// ```
#[derive(Debug)]
pub struct InstructionCell(AtomicU8);

impl InstructionCell {
    /// Create a cell in the `Wait` state
    pub fn new() -> Self {
        Self(AtomicU8::new(Instruction::Wait as u8))
    }

    /// Current instruction (a stale read is benign, bounded by one batch)
    pub fn get(&self) -> Instruction {
        Instruction::from_u8(self.0.load(Ordering::Relaxed))
    }

    /// Publish a new instruction to all workers
    pub fn set(&self, instruction: Instruction) {
        self.0.store(instruction as u8, Ordering::Relaxed);
    }
}

impl Default for InstructionCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_wait() {
        assert_eq!(InstructionCell::new().get(), Instruction::Wait);
    }

    #[test]
    fn test_set_then_get_all_variants() {
        let cell = InstructionCell::new();
        for instruction in [
            Instruction::Start,
            Instruction::Stop,
            Instruction::Pause,
            Instruction::Wait,
        ] {
            cell.set(instruction);
            assert_eq!(cell.get(), instruction);
        }
    }
}
