//! Operator abort input
//!
//! The coordinator's poll loop checks an abort source once per iteration
//! with a millisecond-scale timeout, so the loop never stalls and stays
//! responsive to the operator within that timeout.

use std::io::BufRead;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};

/// Source of an operator abort request
///
/// `poll` waits at most `timeout` and reports whether an abort was
/// requested. Implementations must not block longer than the timeout.
pub trait AbortSignal {
    fn poll(&mut self, timeout: Duration) -> bool;
}

/// Abort source that never fires
///
/// Sleeps the full timeout to preserve the poll loop's pacing; intended
/// for embedding the session where no interactive operator exists.
pub struct NeverAbort;

impl AbortSignal for NeverAbort {
    fn poll(&mut self, timeout: Duration) -> bool {
        thread::sleep(timeout);
        false
    }
}

/// Abort on a `q` / `Q` line from standard input
///
/// A detached reader thread parks on stdin and fires the signal once a
/// quit line arrives; the thread is reclaimed at process exit. Non-quit
/// lines are ignored.
pub struct ConsoleAbort {
    requests: Receiver<()>,
}

impl ConsoleAbort {
    /// Spawn the stdin reader and return the polling handle
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        thread::Builder::new()
            .name("randsim-console".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if matches!(line.trim(), "q" | "Q") {
                        let _ = tx.send(());
                        break;
                    }
                }
            })
            .ok();
        Self { requests: rx }
    }
}

impl Default for ConsoleAbort {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal for ConsoleAbort {
    fn poll(&mut self, timeout: Duration) -> bool {
        match self.requests.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                // Stdin closed without a quit; keep pacing the loop.
                thread::sleep(timeout);
                false
            }
        }
    }
}
