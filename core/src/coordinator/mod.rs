//! Coordinator - session lifecycle and aggregation
//!
//! Owns the shared instruction word, the result channel's receiving end,
//! the global statistics, and both interval histograms; drives the
//! start → poll → stop lifecycle and produces the final report.
//!
//! See `engine.rs` for the full implementation.

mod abort;
mod engine;

pub use abort::{AbortSignal, ConsoleAbort, NeverAbort};
pub use engine::{
    Report, Session, SessionConfig, SessionError, DEFAULT_BATCH_SIZE, MAX_TARGET_COUNT,
    MAX_WORKERS,
};
