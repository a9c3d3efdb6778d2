//! Process abstraction: an identity that sends and receives stamped
//! messages.
//!
//! Each process is bound to the shared [`ClockTable`] and owns one
//! capacity-1 [`Mailbox`]. Sending advances the sender's own clock row,
//! stamps an immutable [`Message`] with the fresh snapshot, and delivers it
//! to the peer's mailbox. Receiving takes one message and merges its clock
//! into the local row only when it carries new causal information.
//!
//! # Concurrency
//!
//! Processes are designed to be shared across tasks (`Arc<Process>`); one
//! task per process is the expected shape but nothing enforces it. The
//! table serializes all clock access on its own; the process adds a local
//! lock so that concurrent receives on the *same* process cannot interleave
//! their take-decide-merge sequences.

use std::sync::Arc;

use crate::clock::{ClockTable, ProcessId, VectorClock};
use crate::error::{ClockError, ReceiveError, SendError};
use crate::mailbox::{Mailbox, MailboxCloser, MailboxSender};
use crate::message::Message;
use crate::sink::{ClockEvent, EventSink, NoopSink};
use tokio::sync::Mutex;

/// Cloneable delivery address of a process.
///
/// Peers hold handles, never the process itself: a handle can only deliver
/// into the mailbox, it cannot touch the owner's clock row or receive on
/// its behalf.
#[derive(Clone)]
pub struct ProcessHandle {
    id: ProcessId,
    sender: MailboxSender,
}

impl ProcessHandle {
    /// The process this handle delivers to.
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Push a message into the owning process's mailbox.
    ///
    /// Blocks while the slot is full; fails once the mailbox is closed.
    /// [`Process::send`] is the normal caller, but harnesses may inject
    /// crafted messages directly.
    pub async fn deliver(&self, message: Message) -> Result<(), SendError> {
        let to = self.id;
        self.sender
            .deliver(message)
            .await
            .map_err(|_| SendError::MailboxClosed { to })
    }
}

/// Outcome of one [`Process::receive`] call.
#[derive(Debug, Clone)]
pub struct ReceiveOutcome {
    /// The consumed message.
    pub message: Message,
    /// Whether the incoming clock advanced local causal knowledge.
    pub merged: bool,
    /// The receiver's row after the decision; identical to the pre-receive
    /// row when the merge was rejected.
    pub clock: VectorClock,
}

/// A participant bound to the shared clock table, with its own mailbox.
pub struct Process {
    id: ProcessId,
    table: Arc<ClockTable>,
    mailbox: Mutex<Mailbox>,
    sender: MailboxSender,
    closer: MailboxCloser,
    sink: Arc<dyn EventSink>,
}

impl Process {
    /// A process bound to `table` with a fresh, empty, capacity-1 mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::IdOutOfRange`] if `id` does not address a row
    /// of `table`; binding is rejected at construction time rather than
    /// discovered later during a merge.
    pub fn new(id: ProcessId, table: Arc<ClockTable>) -> Result<Self, ClockError> {
        if id.index() >= table.len() {
            return Err(ClockError::IdOutOfRange {
                id,
                processes: table.len(),
            });
        }
        let (mailbox, sender, closer) = Mailbox::new();
        Ok(Process {
            id,
            table,
            mailbox: Mutex::new(mailbox),
            sender,
            closer,
            sink: Arc::new(NoopSink),
        })
    }

    /// Install an observer for send/receive outcomes.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// This process's identity.
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// A delivery address peers can send to.
    pub fn handle(&self) -> ProcessHandle {
        ProcessHandle {
            id: self.id,
            sender: self.sender.clone(),
        }
    }

    /// A snapshot of this process's current clock row.
    pub fn clock(&self) -> VectorClock {
        self.table.get(self.id)
    }

    /// Stamp a message and deliver it to `to`.
    ///
    /// Advances the sender's own row by exactly one local event, stamps an
    /// immutable message with the resulting snapshot, and queues it into
    /// the peer's mailbox. Blocks while the peer's slot is full. Not
    /// retried internally: a blocked or failed delivery is the caller's to
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::MailboxClosed`] if the peer tore its mailbox
    /// down. The clock increment has already happened by then; the
    /// returned error only means this message went undelivered.
    pub async fn send(
        &self,
        to: &ProcessHandle,
        event: impl Into<String>,
    ) -> Result<Message, SendError> {
        // Local increment with no merge: the send itself is the event.
        let vector = self.table.update(self.id, None);
        let message = Message::new(self.id, to.id(), vector, event);

        tracing::debug!(
            from = %self.id,
            to = %to.id(),
            id = %message.id,
            vector = %message.vector,
            "sending message"
        );

        to.deliver(message.clone()).await?;

        self.sink.record(&ClockEvent::Sent {
            from: self.id,
            to: to.id(),
            id: message.id,
            vector: message.vector.clone(),
        });
        Ok(message)
    }

    /// Take the next message from the own mailbox and merge its clock if
    /// it advances local causal knowledge.
    ///
    /// Blocks until a message arrives or the mailbox is closed. The whole
    /// take-decide-merge sequence runs under the process's local lock, so
    /// concurrent receives on the same process observe it as atomic. A
    /// rejected merge touches no clock state: only sends and accepted
    /// merges count as local events.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiveError::MailboxClosed`] once the mailbox is shut
    /// down with nothing pending; no clock action is taken.
    pub async fn receive(&self) -> Result<ReceiveOutcome, ReceiveError> {
        let mut mailbox = self.mailbox.lock().await;
        let message = mailbox
            .recv()
            .await
            .map_err(|_| ReceiveError::MailboxClosed)?;

        let local = self.table.get(self.id);
        let merged = message.vector.advances(&local);
        let clock = if merged {
            self.table.update(self.id, Some(&message.vector))
        } else {
            local
        };
        drop(mailbox);

        tracing::debug!(
            process = %self.id,
            from = %message.from,
            id = %message.id,
            merged,
            clock = %clock,
            "received message"
        );

        self.sink.record(&ClockEvent::Received {
            process: self.id,
            from: message.from,
            id: message.id,
            merged,
            clock: clock.clone(),
        });
        Ok(ReceiveOutcome {
            message,
            merged,
            clock,
        })
    }

    /// Tear the mailbox down. Terminal: blocked receives wake with
    /// [`ReceiveError::MailboxClosed`] once pending messages drain, and
    /// pending or future sends toward this process fail immediately.
    pub fn close(&self) {
        tracing::debug!(process = %self.id, "closing mailbox");
        self.closer.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct RecordingSink(StdMutex<Vec<ClockEvent>>);

    impl EventSink for RecordingSink {
        fn record(&self, event: &ClockEvent) {
            self.0.lock().expect("sink lock").push(event.clone());
        }
    }

    #[test]
    fn test_new_rejects_out_of_range_id() {
        let table = Arc::new(ClockTable::new(2));
        let err = Process::new(ProcessId(2), table).err().expect("must reject");
        assert_eq!(
            err,
            ClockError::IdOutOfRange {
                id: ProcessId(2),
                processes: 2
            }
        );
    }

    #[tokio::test]
    async fn test_send_increments_own_slot_by_one() {
        let table = Arc::new(ClockTable::new(2));
        let p0 = Process::new(ProcessId(0), table.clone()).expect("valid id");
        let p1 = Process::new(ProcessId(1), table).expect("valid id");

        let before = p0.clock();
        let message = p0.send(&p1.handle(), "hello").await.expect("slot empty");

        assert_eq!(message.vector.slot(ProcessId(0)), before.slot(ProcessId(0)) + 1);
        assert_eq!(p0.clock(), message.vector);
    }

    #[tokio::test]
    async fn test_receive_merges_componentwise_max_plus_own_increment() {
        let table = Arc::new(ClockTable::new(3));
        let p1 = Process::new(ProcessId(1), table.clone()).expect("valid id");

        let incoming = VectorClock::from(vec![4, 0, 2]);
        p1.handle()
            .deliver(Message::new(ProcessId(0), ProcessId(1), incoming, "x"))
            .await
            .expect("slot empty");

        let outcome = p1.receive().await.expect("message pending");
        assert!(outcome.merged);
        // max([0,0,0], [4,0,2]) with slot 1 bumped for the merge event.
        assert_eq!(outcome.clock.as_slice(), &[4, 1, 2]);
        assert_eq!(p1.clock(), outcome.clock);
    }

    #[tokio::test]
    async fn test_rejected_merge_leaves_row_unchanged() {
        let table = Arc::new(ClockTable::new(2));
        let p0 = Process::new(ProcessId(0), table.clone()).expect("valid id");
        let p1 = Process::new(ProcessId(1), table).expect("valid id");

        // Advance P1 past anything the stale message knows.
        p1.send(&p0.handle(), "warm up").await.expect("slot empty");
        let before = p1.clock();

        let stale = Message::new(ProcessId(0), ProcessId(1), VectorClock::zeroed(2), "old");
        p1.handle().deliver(stale).await.expect("slot empty");

        let outcome = p1.receive().await.expect("message pending");
        assert!(!outcome.merged);
        assert_eq!(outcome.clock, before);
        assert_eq!(p1.clock(), before);
    }

    #[tokio::test]
    async fn test_sink_sees_send_and_receive_outcomes() {
        let sink = Arc::new(RecordingSink(StdMutex::new(Vec::new())));
        let table = Arc::new(ClockTable::new(2));
        let p0 = Process::new(ProcessId(0), table.clone())
            .expect("valid id")
            .with_sink(sink.clone());
        let p1 = Process::new(ProcessId(1), table)
            .expect("valid id")
            .with_sink(sink.clone());

        p0.send(&p1.handle(), "observed").await.expect("slot empty");
        p1.receive().await.expect("message pending");

        let seen = sink.0.lock().expect("sink lock");
        assert_eq!(seen.len(), 2);
        assert!(matches!(
            seen[0],
            ClockEvent::Sent { from: ProcessId(0), to: ProcessId(1), .. }
        ));
        assert!(matches!(
            seen[1],
            ClockEvent::Received { process: ProcessId(1), merged: true, .. }
        ));
    }

    #[tokio::test]
    async fn test_receive_after_close_reports_closed() {
        let table = Arc::new(ClockTable::new(1));
        let p0 = Process::new(ProcessId(0), table).expect("valid id");
        p0.close();
        assert!(matches!(
            p0.receive().await,
            Err(ReceiveError::MailboxClosed)
        ));
    }

    #[tokio::test]
    async fn test_send_to_closed_mailbox_fails_fast() {
        let table = Arc::new(ClockTable::new(2));
        let p0 = Process::new(ProcessId(0), table.clone()).expect("valid id");
        let p1 = Process::new(ProcessId(1), table).expect("valid id");

        p1.close();
        let err = p0.send(&p1.handle(), "too late").await.err().expect("must fail");
        assert_eq!(err, SendError::MailboxClosed { to: ProcessId(1) });

        // The increment already happened; delivery failure does not roll
        // the clock back.
        assert_eq!(p0.clock().slot(ProcessId(0)), 1);
    }
}
