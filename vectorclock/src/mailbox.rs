//! Capacity-1 mailboxes for process-to-process handoff.
//!
//! A [`Mailbox`] is a bounded delivery slot owned by its receiving process.
//! The slot holds at most one message: a second delivery blocks until the
//! first has been received, which bounds every sender→receiver edge to one
//! in-flight message and rules out reordering within that edge by
//! construction.
//!
//! # Teardown
//!
//! Closing is the only teardown primitive and is terminal. A shutdown
//! signal travels on a side channel so that `close` works even while a
//! receive is blocked on the slot: blocked receivers wake and report
//! [`MailboxError::Closed`] once pending messages have drained, and blocked
//! or future deliveries fail immediately rather than hanging.

use crate::error::MailboxError;
use crate::message::Message;
use tokio::sync::{mpsc, watch};

/// Receive half of a capacity-1 mailbox, owned by the receiving process.
pub struct Mailbox {
    rx: mpsc::Receiver<Message>,
    shutdown: watch::Receiver<bool>,
}

/// Cloneable delivery half of a mailbox.
#[derive(Clone)]
pub struct MailboxSender {
    tx: mpsc::Sender<Message>,
    shutdown: watch::Receiver<bool>,
}

/// Handle that permanently shuts a mailbox down.
pub struct MailboxCloser {
    shutdown: watch::Sender<bool>,
}

impl Mailbox {
    /// A fresh, empty mailbox with its delivery and teardown handles.
    pub fn new() -> (Mailbox, MailboxSender, MailboxCloser) {
        let (tx, rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        (
            Mailbox {
                rx,
                shutdown: shutdown_rx.clone(),
            },
            MailboxSender {
                tx,
                shutdown: shutdown_rx,
            },
            MailboxCloser {
                shutdown: shutdown_tx,
            },
        )
    }

    /// Take the next message, blocking until one arrives or the mailbox is
    /// shut down.
    ///
    /// Messages already sitting in the slot when the mailbox closes are
    /// still delivered; [`MailboxError::Closed`] is reported only once
    /// nothing remains.
    pub async fn recv(&mut self) -> Result<Message, MailboxError> {
        if *self.shutdown.borrow_and_update() {
            return self.drain();
        }
        tokio::select! {
            message = self.rx.recv() => message.ok_or(MailboxError::Closed),
            _ = self.shutdown.changed() => self.drain(),
        }
    }

    /// Stop accepting deliveries and hand out whatever is still pending.
    fn drain(&mut self) -> Result<Message, MailboxError> {
        self.rx.close();
        self.rx.try_recv().map_err(|_| MailboxError::Closed)
    }
}

impl MailboxSender {
    /// Deliver one message, blocking while the slot is full.
    ///
    /// Fails immediately with [`MailboxError::Closed`] if the mailbox has
    /// been shut down, including while blocked waiting for the slot.
    pub async fn deliver(&self, message: Message) -> Result<(), MailboxError> {
        let mut shutdown = self.shutdown.clone();
        if *shutdown.borrow_and_update() {
            return Err(MailboxError::Closed);
        }
        tokio::select! {
            sent = self.tx.send(message) => sent.map_err(|_| MailboxError::Closed),
            _ = shutdown.changed() => Err(MailboxError::Closed),
        }
    }
}

impl MailboxCloser {
    /// Shut the mailbox down. Terminal and idempotent.
    pub fn close(&self) {
        // Ignore the result: all receivers gone means already torn down.
        let _ = self.shutdown.send(true);
    }
}
