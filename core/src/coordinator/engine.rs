//! Session engine
//!
//! Main coordinator loop integrating all components:
//! - Worker pool lifecycle (spawn, start broadcast, quit, join)
//! - Result aggregation (match totals, two interval histograms)
//! - Operator abort polling
//! - Final report (throughput, totals, ascending histogram tables)
//!
//! # Architecture
//!
//! One session is one run:
//!
//! ```text
//! 1. Session::new      spawn workers (idle on their control channels)
//! 2. start             publish Instruction::Start, broadcast Start(algo)
//! 3. poll loop         (a) poll abort input with 1 ms timeout
//!                      (b) drain at most one match event
//!                      (c) zero-leading: histogram + decrement target
//!                      (d) one-leading: histogram only
//! 4. exit              target reached, operator abort, or fatal error
//! 5. shutdown          Instruction::Stop, Quit broadcast, join workers
//! 6. report            elapsed, throughput, totals, both histograms
//! ```
//!
//! # Example
//!
//! ```
//! use randsim_core::coordinator::{NeverAbort, Session, SessionConfig};
//! use randsim_core::rng::AlgorithmId;
//!
//! let config = SessionConfig {
//!     target_count: 1,
//!     num_workers: 1,
//!     algorithm: AlgorithmId::Sequence,
//!     batch_size: 64,
//!     // First draw from this seed is 0x00000000CAFEF00D
//!     rng_seed: Some(0xB249BA8B2FAE1B35),
//!     ..SessionConfig::default()
//! };
//!
//! let mut session = Session::new(config).unwrap();
//! let report = session.run_to_completion(&mut NeverAbort);
//! assert_eq!(report.total_zero_leading, 1);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::channel::{result_channel, ResultReceiver};
use crate::coordinator::AbortSignal;
use crate::models::histogram::NETWORK_NODES;
use crate::models::{
    GlobalStats, Histogram, Instruction, InstructionCell, MatchEvent, MatchKind, WorkerCommand,
    INTERVAL_SHIFT,
};
use crate::rng::{splitmix64, AlgorithmId};
use crate::worker::WorkerPool;

// ============================================================================
// Configuration
// ============================================================================

/// Default batch size: one thirty-second of the reference network size
pub const DEFAULT_BATCH_SIZE: usize = (NETWORK_NODES >> 5) as usize;

/// Largest accepted zero-leading match target
pub const MAX_TARGET_COUNT: u32 = 500_000;

/// Largest accepted worker count
pub const MAX_WORKERS: usize = 8;

/// Timeout for each abort poll; also paces the coordinator loop
const ABORT_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Complete session configuration
///
/// Out-of-range operator input is clamped to documented defaults by the
/// CLI layer before it reaches the core; the core itself rejects invalid
/// values instead of silently fixing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Zero-leading matches to collect before the session ends
    pub target_count: u32,

    /// Worker threads, 1..=8
    pub num_workers: usize,

    /// Generation algorithm used by every worker
    pub algorithm: AlgorithmId,

    /// Values per batch (also the unit of the interval histograms)
    pub batch_size: usize,

    /// Fixed base seed for reproducible runs; `None` seeds from the clock
    pub rng_seed: Option<u64>,

    /// Right-shift of the interval bucket quantization (default 8,
    /// calibrated against the fixed reference network size)
    pub interval_shift: u32,

    /// Print one line per aggregated zero-leading match
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_count: 10,
            num_workers: 3,
            algorithm: AlgorithmId::Block,
            batch_size: DEFAULT_BATCH_SIZE,
            rng_seed: None,
            interval_shift: INTERVAL_SHIFT,
            verbose: false,
        }
    }
}

/// Session construction errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration validation error
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Worker thread could not be spawned
    #[error("failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
}

// ============================================================================
// Report
// ============================================================================

/// Final aggregate report for one session
///
/// Only the numeric content and the ascending histogram ordering are a
/// stability contract; the rendered text is free to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Wall-clock duration of the run, clamped to at least 1 ms
    pub elapsed_ms: u64,

    /// Total 64-bit values generated across all workers
    pub generated: u64,

    /// Aggregate throughput in millions of values per second
    /// (integer formula: `(generated / elapsed_ms) >> 10`)
    pub throughput_m_per_s: u64,

    /// Zero-leading matches aggregated before the session ended
    pub total_zero_leading: u64,

    /// One-leading matches aggregated before the session ended
    pub total_one_leading: u64,

    /// `(bucket, occurrences)` for zero-leading intervals, ascending
    pub zero_leading_intervals: Vec<(u32, u32)>,

    /// `(bucket, occurrences)` for one-leading intervals, ascending
    pub one_leading_intervals: Vec<(u32, u32)>,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "simulation: random generated speed = {} (M/s), total used time = {}(s)",
            self.throughput_m_per_s,
            self.elapsed_ms / 1000
        )?;
        writeln!(
            f,
            "simulation: found total 32bit0 leading: {}, total 32bit1 leading: {}",
            self.total_zero_leading, self.total_one_leading
        )?;
        writeln!(f, "\nInterval  0-Occur")?;
        for (bucket, count) in &self.zero_leading_intervals {
            writeln!(f, "{:4}   {:4}", bucket, count)?;
        }
        writeln!(f, "\nInterval  1-Occur")?;
        for (bucket, count) in &self.one_leading_intervals {
            writeln!(f, "{:4}   {:4}", bucket, count)?;
        }
        Ok(())
    }
}

// ============================================================================
// Session
// ============================================================================

/// One simulation run: worker pool plus coordinator state
///
/// Created with workers idle; `run_to_completion` drives the whole
/// lifecycle. All teardown paths are idempotent, so the session always
/// exits cleanly whether the target was reached, the operator aborted,
/// or the message layer failed.
pub struct Session {
    config: SessionConfig,
    instruction: Arc<InstructionCell>,
    stats: Arc<GlobalStats>,
    pool: WorkerPool,
    results: ResultReceiver,
    zero_histogram: Histogram,
    one_histogram: Histogram,
    total_zero: u64,
    total_one: u64,
    remaining: i64,
}

impl Session {
    /// Validate the configuration and spawn the (idle) worker pool
    ///
    /// # Errors
    ///
    /// * [`SessionError::InvalidConfig`] - target, worker count, or batch
    ///   size out of range
    /// * [`SessionError::Spawn`] - a worker thread could not be created
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Self::validate_config(&config)?;

        let instruction = Arc::new(InstructionCell::new());
        let stats = Arc::new(GlobalStats::new());
        let (result_tx, result_rx) = result_channel();

        let base_seed = config.rng_seed.unwrap_or_else(entropy_seed);
        let pool = WorkerPool::spawn(
            config.num_workers,
            config.batch_size,
            base_seed,
            Arc::clone(&instruction),
            Arc::clone(&stats),
            &result_tx,
        )?;
        // The pool's workers hold the only long-lived senders; dropping
        // result_tx here lets a fully-dead pool surface as a receive
        // error instead of a silent forever-empty channel.
        drop(result_tx);

        let remaining = i64::from(config.target_count);
        let zero_histogram = Histogram::with_shift(config.interval_shift);
        let one_histogram = Histogram::with_shift(config.interval_shift);
        Ok(Self {
            config,
            instruction,
            stats,
            pool,
            results: result_rx,
            zero_histogram,
            one_histogram,
            total_zero: 0,
            total_one: 0,
            remaining,
        })
    }

    fn validate_config(config: &SessionConfig) -> Result<(), SessionError> {
        if config.target_count == 0 || config.target_count > MAX_TARGET_COUNT {
            return Err(SessionError::InvalidConfig(format!(
                "target_count must be in [1, {}], got {}",
                MAX_TARGET_COUNT, config.target_count
            )));
        }
        if config.num_workers == 0 || config.num_workers > MAX_WORKERS {
            return Err(SessionError::InvalidConfig(format!(
                "num_workers must be in [1, {}], got {}",
                MAX_WORKERS, config.num_workers
            )));
        }
        if config.batch_size == 0 {
            return Err(SessionError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Command the workers to start generating
    ///
    /// Idempotent: if the instruction word is already `Start`, no
    /// commands are re-sent and no state is reset. A failed command send
    /// is fatal to the run: remaining sends stop and the target is
    /// forced to zero so the next loop falls through to teardown.
    pub fn start(&mut self) {
        if self.instruction.get() == Instruction::Start {
            return;
        }
        self.instruction.set(Instruction::Start);
        if let Err(err) = self
            .pool
            .broadcast(WorkerCommand::Start(self.config.algorithm))
        {
            eprintln!("fatal: start broadcast failed: {}", err);
            self.remaining = 0;
        }
    }

    /// Drive the poll loop until the target is reached, the operator
    /// aborts, or a channel failure occurs; then tear down and report
    pub fn run_to_completion(&mut self, abort: &mut dyn AbortSignal) -> Report {
        let started_at = Instant::now();
        self.start();

        while self.remaining > 0 {
            if abort.poll(ABORT_POLL_TIMEOUT) {
                eprintln!("quit by request");
                break;
            }

            match self.results.try_recv() {
                Ok(Some(event)) => self.aggregate(event),
                Ok(None) => {}
                Err(err) => {
                    eprintln!("fatal: result channel failed: {}", err);
                    self.remaining = 0;
                }
            }
        }

        self.shutdown();
        self.build_report(started_at)
    }

    /// Fold one match event into the totals and histograms
    ///
    /// Zero-leading matches count against the target; one-leading
    /// matches only populate their histogram.
    fn aggregate(&mut self, event: MatchEvent) {
        match event.kind {
            MatchKind::ZeroLeading => {
                let bucket = self.zero_histogram.record(event.elapsed_batches);
                self.total_zero += 1;
                self.remaining -= 1;
                if self.config.verbose {
                    println!(
                        "value={:016x} left={:<6} interval=0x{:08x} generated=0x{:016x}",
                        event.value,
                        self.remaining,
                        bucket,
                        self.stats.generated()
                    );
                }
            }
            MatchKind::OneLeading => {
                self.one_histogram.record(event.elapsed_batches);
                self.total_one += 1;
            }
        }
    }

    /// Stop generation and join every worker thread
    ///
    /// Idempotent; also invoked implicitly when the session drops.
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }

    fn build_report(&mut self, started_at: Instant) -> Report {
        // Avoid a zero divisor on sub-millisecond runs.
        let elapsed_ms = (started_at.elapsed().as_millis() as u64).max(1);
        let generated = self.stats.generated();

        let zero_leading_intervals: Vec<(u32, u32)> = self.zero_histogram.iter().collect();
        let one_leading_intervals: Vec<(u32, u32)> = self.one_histogram.iter().collect();
        self.zero_histogram.clear();
        self.one_histogram.clear();

        Report {
            elapsed_ms,
            generated,
            throughput_m_per_s: (generated / elapsed_ms) >> 10,
            total_zero_leading: self.total_zero,
            total_one_leading: self.total_one,
            zero_leading_intervals,
            one_leading_intervals,
        }
    }

    /// Number of worker threads backing this session
    pub fn num_workers(&self) -> usize {
        self.pool.num_workers()
    }

    /// Total values generated so far
    pub fn generated(&self) -> u64 {
        self.stats.generated()
    }

    /// Current shared instruction
    pub fn instruction(&self) -> Instruction {
        self.instruction.get()
    }
}

/// Clock-derived seed for runs without a fixed seed
fn entropy_seed() -> u64 {
    let mut state = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x5EED);
    splitmix64(&mut state)
}
