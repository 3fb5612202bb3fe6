//! Worker pool and per-worker mining loop
//!
//! Each worker owns one random provider and a pair of miss counters, and
//! runs the generate → test → report loop. Workers are spawned at session
//! start and live until they receive `Quit`; between batches they re-read
//! the shared instruction word, so cancellation is cooperative with a
//! latency bound of one batch.

use std::sync::Arc;
use std::thread;

use crate::channel::{control_channel, ControlReceiver, ControlSender, ResultSender};
use crate::models::{GlobalStats, Instruction, InstructionCell, MatchEvent, MatchKind, WorkerCommand};
use crate::rng::{build_provider, RandomProvider};

/// Everything a worker thread needs, moved in at spawn time
struct WorkerContext {
    index: usize,
    batch_size: usize,
    seed: u64,
    instruction: Arc<InstructionCell>,
    stats: Arc<GlobalStats>,
    control: ControlReceiver,
    results: ResultSender,
}

/// Dynamically sized collection of worker threads and their control
/// channels
///
/// Shutdown discipline: publish `Stop`, send each worker a `Quit`, then
/// join. `Drop` performs the same teardown, so a pool can never leak
/// running threads.
pub struct WorkerPool {
    handles: Vec<thread::JoinHandle<()>>,
    controls: Vec<ControlSender>,
    instruction: Arc<InstructionCell>,
}

impl WorkerPool {
    /// Spawn `num_workers` idle workers
    ///
    /// Worker `i` derives its seed from `base_seed` so that runs with a
    /// fixed seed replay exactly (worker 0 uses `base_seed` unchanged).
    /// Each worker clones the shared result sender; the pool keeps the
    /// per-worker control senders.
    pub fn spawn(
        num_workers: usize,
        batch_size: usize,
        base_seed: u64,
        instruction: Arc<InstructionCell>,
        stats: Arc<GlobalStats>,
        results: &ResultSender,
    ) -> std::io::Result<Self> {
        let mut handles = Vec::with_capacity(num_workers);
        let mut controls = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (control_tx, control_rx) = control_channel();
            let ctx = WorkerContext {
                index,
                batch_size,
                seed: derive_worker_seed(base_seed, index),
                instruction: Arc::clone(&instruction),
                stats: Arc::clone(&stats),
                control: control_rx,
                results: results.clone(),
            };

            let handle = thread::Builder::new()
                .name(format!("randsim-worker-{}", index))
                .spawn(move || run_worker(ctx))?;

            handles.push(handle);
            controls.push(control_tx);
        }

        Ok(Self {
            handles,
            controls,
            instruction,
        })
    }

    /// Number of workers the pool was spawned with
    pub fn num_workers(&self) -> usize {
        self.controls.len()
    }

    /// Send `command` to every worker, stopping at the first failure
    ///
    /// A failed send means a worker is gone and its channel closed; the
    /// caller treats that as fatal to the run.
    pub fn broadcast(&self, command: WorkerCommand) -> Result<(), crate::channel::ChannelError> {
        for control in &self.controls {
            control.send(command)?;
        }
        Ok(())
    }

    /// Stop generation, quit every worker, and join their threads
    ///
    /// Idempotent: a second call finds nothing left to join.
    pub fn shutdown(&mut self) {
        self.instruction.set(Instruction::Stop);
        for control in &self.controls {
            // Best effort: a worker that already exited has closed its
            // channel, the remaining workers still get their Quit.
            let _ = control.send(WorkerCommand::Quit);
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        self.controls.clear();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Per-worker seed derivation
///
/// XOR with a golden-ratio multiple decorrelates neighboring workers while
/// leaving worker 0 on the configured base seed.
fn derive_worker_seed(base_seed: u64, index: usize) -> u64 {
    base_seed ^ (index as u64).wrapping_mul(crate::rng::GOLDEN_GAMMA)
}

/// Worker thread entry: command loop around the mining loop
///
/// Idle → blocked on the control channel. `Start` builds the provider and
/// enters the mining loop; a provider construction failure terminates
/// this worker only (the run continues degraded). `Quit`, a closed
/// control channel, or a failed result send all terminate the worker.
fn run_worker(ctx: WorkerContext) {
    while let Ok(command) = ctx.control.recv() {
        match command {
            WorkerCommand::Quit => break,
            WorkerCommand::Start(algorithm) => {
                // Restart reseeds the provider and zeroes both counters,
                // so a Stop → Start cycle is idempotent.
                let provider = match build_provider(algorithm, ctx.seed, ctx.batch_size) {
                    Ok(provider) => provider,
                    Err(err) => {
                        eprintln!("worker {}: cannot start generation: {}", ctx.index, err);
                        return;
                    }
                };
                if mine(&ctx, provider).is_err() {
                    // Result channel gone: nobody is listening anymore.
                    return;
                }
            }
        }
    }
}

/// The generate → test → report loop
///
/// Runs until the shared instruction leaves `Start`. Returns `Err` only
/// when a match report could not be delivered.
fn mine(ctx: &WorkerContext, mut provider: Box<dyn RandomProvider>) -> Result<(), ()> {
    let mut batch = vec![0u64; ctx.batch_size];
    let mut misses_since_zero: u64 = 0;
    let mut misses_since_one: u64 = 0;

    while ctx.instruction.get() == Instruction::Start {
        provider.fill(&mut batch);

        let mut found_zero = false;
        let mut found_one = false;
        for &value in &batch {
            let (kind, elapsed_batches) = match MatchKind::classify(value) {
                Some(MatchKind::ZeroLeading) => (MatchKind::ZeroLeading, misses_since_zero),
                Some(MatchKind::OneLeading) => (MatchKind::OneLeading, misses_since_one),
                None => continue,
            };
            let event = MatchEvent {
                kind,
                elapsed_batches,
                value,
            };
            // Emission is serialized by the stats lock so no other
            // worker's report or count update interleaves with it.
            if ctx.stats.emit_match(&ctx.results, event).is_err() {
                return Err(());
            }
            match kind {
                MatchKind::ZeroLeading => found_zero = true,
                MatchKind::OneLeading => found_one = true,
            }
        }

        ctx.stats.add_generated(ctx.batch_size as u64);

        // One more batch elapsed; a counter that matched this batch ends
        // the step at zero instead of incrementing.
        misses_since_zero += 1;
        misses_since_one += 1;
        if found_zero {
            misses_since_zero = 0;
        }
        if found_one {
            misses_since_one = 0;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_zero_keeps_base_seed() {
        assert_eq!(derive_worker_seed(0xDEAD_BEEF, 0), 0xDEAD_BEEF);
    }

    #[test]
    fn test_worker_seeds_distinct() {
        let base = 42;
        let seeds: Vec<u64> = (0..8).map(|i| derive_worker_seed(base, i)).collect();
        for i in 0..seeds.len() {
            for j in (i + 1)..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
    }
}
