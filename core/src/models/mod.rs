//! Domain types for the simulation core

pub mod histogram;
pub mod instruction;
pub mod message;
pub mod stats;

pub use histogram::{interval_bucket, Histogram, INTERVAL_SHIFT};
pub use instruction::{Instruction, InstructionCell};
pub use message::{MatchEvent, MatchKind, WorkerCommand};
pub use stats::GlobalStats;
