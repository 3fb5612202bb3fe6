//! Tests for the worker pool lifecycle and shared-statistics discipline

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use randsim_core::channel::result_channel;
use randsim_core::models::{GlobalStats, Instruction, InstructionCell, WorkerCommand};
use randsim_core::rng::AlgorithmId;
use randsim_core::worker::WorkerPool;

#[test]
fn test_generated_count_has_no_lost_updates() {
    // 8 writers x 1000 batches of 4096 values must be observed exactly.
    let stats = Arc::new(GlobalStats::new());
    let batches_per_writer = 1000u64;
    let batch_size = 4096u64;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                for _ in 0..batches_per_writer {
                    stats.add_generated(batch_size);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(stats.generated(), 8 * batches_per_writer * batch_size);
}

#[test]
fn test_pool_spawns_requested_worker_count() {
    let instruction = Arc::new(InstructionCell::new());
    let stats = Arc::new(GlobalStats::new());
    let (result_tx, _result_rx) = result_channel();

    let mut pool = WorkerPool::spawn(
        5,
        1024,
        42,
        Arc::clone(&instruction),
        Arc::clone(&stats),
        &result_tx,
    )
    .unwrap();
    assert_eq!(pool.num_workers(), 5);
    pool.shutdown();
}

#[test]
fn test_idle_pool_shutdown_without_start() {
    let instruction = Arc::new(InstructionCell::new());
    let stats = Arc::new(GlobalStats::new());
    let (result_tx, _result_rx) = result_channel();

    let mut pool = WorkerPool::spawn(
        3,
        1024,
        7,
        Arc::clone(&instruction),
        Arc::clone(&stats),
        &result_tx,
    )
    .unwrap();
    pool.shutdown();

    // Nothing generated, nothing wedged.
    assert_eq!(stats.generated(), 0);
    assert_eq!(instruction.get(), Instruction::Stop);
}

#[test]
fn test_shutdown_bound_while_generating() {
    let instruction = Arc::new(InstructionCell::new());
    let stats = Arc::new(GlobalStats::new());
    let (result_tx, _result_rx) = result_channel();

    let mut pool = WorkerPool::spawn(
        4,
        65_536,
        99,
        Arc::clone(&instruction),
        Arc::clone(&stats),
        &result_tx,
    )
    .unwrap();

    instruction.set(Instruction::Start);
    pool.broadcast(WorkerCommand::Start(AlgorithmId::Sequence))
        .unwrap();
    thread::sleep(Duration::from_millis(50));
    assert!(stats.generated() > 0, "workers never produced a batch");

    // Workers notice Stop between batches; joining must not take longer
    // than one batch plus generous scheduling slack.
    let begun = Instant::now();
    pool.shutdown();
    assert!(
        begun.elapsed() < Duration::from_secs(5),
        "shutdown exceeded the one-batch latency bound"
    );
}

#[test]
fn test_stop_then_restart_resumes_generation() {
    let instruction = Arc::new(InstructionCell::new());
    let stats = Arc::new(GlobalStats::new());
    let (result_tx, _result_rx) = result_channel();

    let pool = WorkerPool::spawn(
        1,
        1024,
        12345,
        Arc::clone(&instruction),
        Arc::clone(&stats),
        &result_tx,
    )
    .unwrap();

    instruction.set(Instruction::Start);
    pool.broadcast(WorkerCommand::Start(AlgorithmId::Sequence))
        .unwrap();
    thread::sleep(Duration::from_millis(20));
    assert!(stats.generated() > 0);

    // Stop: the worker drains back to its control channel within one
    // batch, possibly finishing one extra batch first.
    instruction.set(Instruction::Stop);
    thread::sleep(Duration::from_millis(20));
    let after_stop = stats.generated();

    // Restart reseeds and resumes; the count keeps growing.
    instruction.set(Instruction::Start);
    pool.broadcast(WorkerCommand::Start(AlgorithmId::Sequence))
        .unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while stats.generated() <= after_stop {
        assert!(Instant::now() < deadline, "worker did not resume");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_shutdown_is_idempotent() {
    let instruction = Arc::new(InstructionCell::new());
    let stats = Arc::new(GlobalStats::new());
    let (result_tx, _result_rx) = result_channel();

    let mut pool =
        WorkerPool::spawn(2, 1024, 1, instruction, stats, &result_tx).unwrap();
    pool.shutdown();
    pool.shutdown();
}

#[test]
fn test_worker_with_undersized_block_batch_terminates_alone() {
    let instruction = Arc::new(InstructionCell::new());
    let stats = Arc::new(GlobalStats::new());
    let (result_tx, _result_rx) = result_channel();

    // Batch below BlockXorshift's minimum: the worker logs, refuses to
    // generate, and terminates without side effects.
    let pool = WorkerPool::spawn(
        1,
        16,
        1,
        Arc::clone(&instruction),
        Arc::clone(&stats),
        &result_tx,
    )
    .unwrap();

    instruction.set(Instruction::Start);
    pool.broadcast(WorkerCommand::Start(AlgorithmId::Block))
        .unwrap();

    // The worker's control channel closes once it exits.
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if pool.broadcast(WorkerCommand::Start(AlgorithmId::Block)).is_err() {
            break;
        }
        assert!(Instant::now() < deadline, "worker never terminated");
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(stats.generated(), 0);
}
