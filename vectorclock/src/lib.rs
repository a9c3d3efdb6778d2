//! # Vectorclock
//!
//! Causal ordering among concurrently executing processes, modeled with
//! vector clocks and point-to-point message delivery that carries and
//! merges clock state.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Process 0            Process 1            Process 2         │
//! │ ┌─────────┐          ┌─────────┐          ┌─────────┐       │
//! │ │ Mailbox │◄─ send ──│ Mailbox │◄─ send ──│ Mailbox │       │
//! │ │ (cap 1) │          │ (cap 1) │          │ (cap 1) │       │
//! │ └────┬────┘          └────┬────┘          └────┬────┘       │
//! │      │ receive            │ receive            │ receive    │
//! ├──────┴────────────────────┴────────────────────┴────────────┤
//! │                        ClockTable                           │
//! │        one row per process, one lock for the table          │
//! │        update = merge componentwise max, then +1 own slot   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A send advances the sender's own clock row, stamps an immutable
//! [`Message`] with the fresh snapshot, and queues it into the peer's
//! capacity-1 [`Mailbox`] (blocking while the slot is full). A receive
//! takes one message and merges its clock into the local row only when it
//! carries causal information the local row lacks.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use vectorclock::{ClockTable, Process, ProcessId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Arc::new(ClockTable::new(2));
//! let p0 = Process::new(ProcessId(0), table.clone())?;
//! let p1 = Process::new(ProcessId(1), table)?;
//!
//! p0.send(&p1.handle(), "hello from P0").await?;
//! let outcome = p1.receive().await?;
//! assert!(outcome.merged);
//! assert_eq!(outcome.clock.as_slice(), &[1, 1]);
//! # Ok(())
//! # }
//! ```
//!
//! ## What the core does not do
//!
//! Process wiring and topology, textual formatting of events, and scenario
//! orchestration belong to the caller. Send/receive outcomes are reported
//! as structured [`ClockEvent`]s to a caller-supplied [`EventSink`]; the
//! library itself performs no I/O.

#![deny(missing_docs)]

pub mod clock;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod process;
pub mod sink;

pub use clock::{ClockTable, ProcessId, VectorClock};
pub use error::{ClockError, MailboxError, ReceiveError, SendError};
pub use mailbox::{Mailbox, MailboxCloser, MailboxSender};
pub use message::{Message, MessageId};
pub use process::{Process, ProcessHandle, ReceiveOutcome};
pub use sink::{ClockEvent, EventSink, NoopSink};
