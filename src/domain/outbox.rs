//! Per-connection outbound queue.
//!
//! [`Outbox`] wraps the sending half of a bounded [`tokio::sync::mpsc`]
//! channel. The connection task owns the receiver and writes to the
//! socket; everything else only enqueues. Delivery never waits: when a
//! peer's queue is full the notice is dropped for that peer alone.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::{ConnectionId, Notice};

/// Sending handle for one connection's notices.
#[derive(Debug, Clone)]
pub struct Outbox {
    connection: ConnectionId,
    sender: mpsc::Sender<Notice>,
}

impl Outbox {
    /// Creates an outbox and the receiver the connection task drains.
    ///
    /// A `capacity` of zero is raised to one.
    #[must_use]
    pub fn channel(connection: ConnectionId, capacity: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { connection, sender }, receiver)
    }

    /// Connection this outbox delivers to.
    #[must_use]
    pub const fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Enqueues a notice without waiting.
    ///
    /// Returns `false` if the notice was dropped because the queue is full
    /// or the connection task has gone away.
    pub fn deliver(&self, notice: Notice) -> bool {
        match self.sender.try_send(notice) {
            Ok(()) => true,
            Err(TrySendError::Full(notice)) => {
                tracing::warn!(
                    connection = %self.connection,
                    kind = notice.kind(),
                    "outbox full, dropping notice"
                );
                false
            }
            Err(TrySendError::Closed(notice)) => {
                tracing::debug!(
                    connection = %self.connection,
                    kind = notice.kind(),
                    "outbox closed, dropping notice"
                );
                false
            }
        }
    }
}
