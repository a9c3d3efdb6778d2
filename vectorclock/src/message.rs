//! Message types exchanged between processes.

use crate::clock::{ProcessId, VectorClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Source of message-id nonces, shared by every process in this program.
static NEXT_NONCE: AtomicU64 = AtomicU64::new(0);

/// Globally unique message identifier.
///
/// Combines the originating process id with a monotonically increasing
/// nonce, so ids stay unique even when many processes stamp messages in the
/// same instant.
///
/// # String Format
///
/// `{origin}-{nonce}`, e.g. `0-17`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId {
    /// The process that stamped the message.
    pub origin: ProcessId,
    /// Monotonically distinct sequence number.
    pub nonce: u64,
}

impl MessageId {
    /// The next fresh id for messages originating at `origin`.
    pub(crate) fn next(origin: ProcessId) -> Self {
        MessageId {
            origin,
            nonce: NEXT_NONCE.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.nonce)
    }
}

/// Unit of communication between processes, immutable once constructed.
///
/// Carries the sender's clock snapshot taken at send time. The snapshot is
/// a deep copy: merges performed after dispatch never alter a message
/// already in flight. A message is constructed by
/// [`Process::send`](crate::process::Process::send), consumed exactly once
/// by the matching receive, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sending process.
    pub from: ProcessId,
    /// Receiving process.
    pub to: ProcessId,
    /// Sender's clock snapshot at send time.
    pub vector: VectorClock,
    /// Opaque payload, e.g. descriptive text.
    pub event: String,
    /// Globally unique identifier.
    pub id: MessageId,
    /// Coarse send time.
    pub timestamp: SystemTime,
}

impl Message {
    /// Stamp a new message with a fresh id and the current time.
    ///
    /// Normally called by `Process::send` with a snapshot it just read
    /// back from the clock table; exposed so harnesses can inject crafted
    /// messages directly into a mailbox.
    pub fn new(
        from: ProcessId,
        to: ProcessId,
        vector: VectorClock,
        event: impl Into<String>,
    ) -> Self {
        Message {
            from,
            to,
            vector,
            event: event.into(),
            id: MessageId::next(from),
            timestamp: SystemTime::now(),
        }
    }
}
