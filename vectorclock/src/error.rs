//! Error types for the vector-clock messaging core.

use crate::clock::ProcessId;
use thiserror::Error;

/// Errors related to clock-table construction and process binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    /// Process id is outside the table's `[0, N)` range.
    #[error("process id {id} out of range for table of {processes} processes")]
    IdOutOfRange {
        /// The rejected id.
        id: ProcessId,
        /// Number of processes the table was built for.
        processes: usize,
    },
}

/// Errors related to mailbox delivery and teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MailboxError {
    /// The mailbox has been closed; no further delivery or receipt is
    /// possible once pending messages have drained.
    #[error("mailbox closed")]
    Closed,
}

/// Errors surfaced by [`Process::send`](crate::process::Process::send).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The target process tore down its mailbox. The sender's clock
    /// increment has already happened and remains observable; only the
    /// delivery itself failed.
    #[error("mailbox of process {to} is closed")]
    MailboxClosed {
        /// The unreachable peer.
        to: ProcessId,
    },
}

/// Errors surfaced by [`Process::receive`](crate::process::Process::receive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReceiveError {
    /// The mailbox was closed with no pending message. Terminal and
    /// expected during teardown; no clock state was touched.
    #[error("mailbox closed with no pending message")]
    MailboxClosed,
}
