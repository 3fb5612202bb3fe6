//! randsim - command-line front end
//!
//! Parses the positional operator arguments, clamps out-of-range values to
//! the documented defaults (the core rejects rather than fixes invalid
//! input), and drives one session to completion.

use std::process::ExitCode;

use randsim_core::rng::AlgorithmId;
use randsim_core::{ConsoleAbort, Session, SessionConfig, MAX_TARGET_COUNT, MAX_WORKERS};

const USAGE: &str = "usage: randsim [numbers-of-precious-32bits-leading0] [threads] [algorithm]
        threads number: [1..8]
        algorithm: [0: xorshift64* sequence; 1: xorshift64* block; 2: splitmix64 system]
        Tips: if need quit during the generation, press 'q' and 'Enter'";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() > 3 {
        eprintln!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let mut config = SessionConfig {
        verbose: true,
        ..SessionConfig::default()
    };

    if let Some(raw) = args.first() {
        match raw.parse::<u32>() {
            Ok(target) if (1..=MAX_TARGET_COUNT).contains(&target) => {
                config.target_count = target;
            }
            _ => eprintln!(
                "warning: precious count must be in [1..{}], drawing back to {} as default",
                MAX_TARGET_COUNT, config.target_count
            ),
        }
    }

    if let Some(raw) = args.get(1) {
        match raw.parse::<usize>() {
            Ok(threads) if (1..=MAX_WORKERS).contains(&threads) => {
                config.num_workers = threads;
            }
            _ => eprintln!(
                "warning: active threads must be [1..{}], drawing back to {} as default",
                MAX_WORKERS, config.num_workers
            ),
        }
    }

    if let Some(raw) = args.get(2) {
        match raw.parse::<u8>().ok().and_then(AlgorithmId::from_id) {
            Some(algorithm) => config.algorithm = algorithm,
            None => eprintln!(
                "warning: algorithm must be [0..2], drawing back to [{}] as default",
                config.algorithm.name()
            ),
        }
    }

    println!(
        "simulation settings summary: precious-rand-numbers={}, threads={}, algorithm=[{}]",
        config.target_count,
        config.num_workers,
        config.algorithm.name()
    );

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let report = session.run_to_completion(&mut ConsoleAbort::new());
    println!("{}", report);
    ExitCode::SUCCESS
}
