//! Typed in-process message channels
//!
//! Thin wrappers over bounded crossbeam channels giving each direction of
//! the protocol its own endpoint types: one control channel per worker
//! (coordinator → worker, blocking receive) and one shared result channel
//! (workers → coordinator, non-blocking receive). Enqueue is atomic per
//! message; the channel never delivers a partial record.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use thiserror::Error;

use crate::models::{MatchEvent, WorkerCommand};

/// Depth of each worker's control channel. Only start/quit commands flow
/// here, never more than a couple in flight.
const CONTROL_DEPTH: usize = 4;

/// Depth of the shared result channel. Matches are rare; this only needs
/// to absorb a burst while the coordinator is between polls.
const RESULT_DEPTH: usize = 1024;

/// Message-passing failures
///
/// Always fatal to the owning side: a worker failing to send exits its
/// loop, a coordinator failing to send or receive tears the session down.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("channel send failed: receiving side disconnected")]
    SendDisconnected,

    #[error("channel receive failed: sending side disconnected")]
    RecvDisconnected,
}

/// Coordinator-held sending end of one worker's control channel
#[derive(Debug, Clone)]
pub struct ControlSender(Sender<WorkerCommand>);

impl ControlSender {
    /// Deliver a command to the owning worker
    pub fn send(&self, command: WorkerCommand) -> Result<(), ChannelError> {
        self.0
            .send(command)
            .map_err(|_| ChannelError::SendDisconnected)
    }
}

/// Worker-held receiving end of its control channel
#[derive(Debug)]
pub struct ControlReceiver(Receiver<WorkerCommand>);

impl ControlReceiver {
    /// Block until the next command arrives
    pub fn recv(&self) -> Result<WorkerCommand, ChannelError> {
        self.0.recv().map_err(|_| ChannelError::RecvDisconnected)
    }
}

/// Create the control channel for a single worker
pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (tx, rx) = bounded(CONTROL_DEPTH);
    (ControlSender(tx), ControlReceiver(rx))
}

/// Worker-held sending end of the shared result channel
#[derive(Debug, Clone)]
pub struct ResultSender(Sender<MatchEvent>);

impl ResultSender {
    /// Enqueue one match event for the coordinator
    pub fn send(&self, event: MatchEvent) -> Result<(), ChannelError> {
        self.0
            .send(event)
            .map_err(|_| ChannelError::SendDisconnected)
    }
}

/// Coordinator-held receiving end of the shared result channel
#[derive(Debug)]
pub struct ResultReceiver(Receiver<MatchEvent>);

impl ResultReceiver {
    /// Drain at most one pending event without blocking
    ///
    /// `Ok(None)` means the channel is currently empty; a disconnected
    /// channel is an error because workers hold their senders for the
    /// whole session.
    pub fn try_recv(&self) -> Result<Option<MatchEvent>, ChannelError> {
        match self.0.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::RecvDisconnected),
        }
    }
}

/// Create the shared result channel
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    let (tx, rx) = bounded(RESULT_DEPTH);
    (ResultSender(tx), ResultReceiver(rx))
}
