//! Randsim Core - mining-odds simulation engine
//!
//! Empirically measures, via in-process simulation, the arrival-time
//! distribution of rare 64-bit random values whose upper 32 bits are
//! all-zero or all-one - a proxy for proof-of-work mining odds across a
//! configurable pool of parallel generator threads.
//!
//! # Architecture
//!
//! - **models**: Domain types (messages, instruction word, stats, histograms)
//! - **rng**: Pluggable 64-bit generators behind the batch contract
//! - **channel**: Typed in-process control and result channels
//! - **worker**: Worker pool and the generate → test → report loop
//! - **coordinator**: Session lifecycle, aggregation, and reporting
//!
//! # Critical Invariants
//!
//! 1. The global generated-count only increases; no lost updates
//! 2. A miss counter that just matched resets to 0 in the same batch step
//! 3. Interval buckets are always clamped to [0, 255]
//! 4. Fixed seed + fixed config = identical match sequence per worker

// Module declarations
pub mod channel;
pub mod coordinator;
pub mod models;
pub mod rng;
pub mod worker;

// Re-exports for convenience
pub use channel::{control_channel, result_channel, ChannelError};
pub use coordinator::{
    AbortSignal, ConsoleAbort, NeverAbort, Report, Session, SessionConfig, SessionError,
    DEFAULT_BATCH_SIZE, MAX_TARGET_COUNT, MAX_WORKERS,
};
pub use models::{
    interval_bucket, GlobalStats, Histogram, Instruction, InstructionCell, MatchEvent, MatchKind,
    WorkerCommand, INTERVAL_SHIFT,
};
pub use rng::{build_provider, AlgorithmId, RandomProvider, RngError};
pub use worker::WorkerPool;
