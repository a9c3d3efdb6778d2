//! Observability hook for send/receive outcomes.
//!
//! The core never formats text or performs I/O on its own: every send and
//! receive outcome is reported as a structured [`ClockEvent`] to a
//! caller-supplied [`EventSink`]. The orchestration layer decides what to
//! do with it (log it, collect it, drop it). Reporting has no effect on
//! correctness.

use crate::clock::{ProcessId, VectorClock};
use crate::message::MessageId;
use serde::{Deserialize, Serialize};

/// Structured outcome of one clock-relevant operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEvent {
    /// A message was stamped and queued toward a peer.
    Sent {
        /// Sending process.
        from: ProcessId,
        /// Receiving process.
        to: ProcessId,
        /// Identifier of the dispatched message.
        id: MessageId,
        /// Sender's row right after its send increment.
        vector: VectorClock,
    },
    /// A message was taken from the mailbox and the merge decision made.
    Received {
        /// Receiving process.
        process: ProcessId,
        /// Peer the message came from.
        from: ProcessId,
        /// Identifier of the consumed message.
        id: MessageId,
        /// Whether the incoming clock advanced local causal knowledge.
        merged: bool,
        /// The receiver's row after the decision (unchanged when the merge
        /// was rejected).
        clock: VectorClock,
    },
}

/// Receiver for structured send/receive outcomes.
///
/// Implementations must be cheap and non-blocking: the core may call
/// [`record`](EventSink::record) while holding a process's receive lock.
pub trait EventSink: Send + Sync {
    /// Record one outcome.
    fn record(&self, event: &ClockEvent);
}

/// Sink that discards every event; the default when none is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &ClockEvent) {}
}
