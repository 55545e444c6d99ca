//! Individual WebSocket connection handle.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use teslo_core::types::id::ConnectionId;

/// A handle to a single WebSocket connection.
///
/// Holds the sender feeding the socket writer task and the token used to
/// force the socket closed. Identity lives in the session registry.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Transport-assigned connection ID.
    pub id: ConnectionId,
    /// Serialized outbound frames.
    sender: mpsc::Sender<String>,
    /// Cancelled when the connection must close.
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Creates a handle and the receiver its writer task drains.
    ///
    /// The close token is a child of `shutdown`, so cancelling the parent
    /// closes every connection created from it.
    pub fn open(
        buffer: usize,
        shutdown: &CancellationToken,
    ) -> (Arc<Self>, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = Arc::new(Self {
            id: ConnectionId::new(),
            sender,
            closed: shutdown.child_token(),
        });
        (handle, receiver)
    }

    /// Queues a frame without waiting. Returns `false` if it was dropped.
    pub fn send(&self, frame: String) -> bool {
        if self.is_closed() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                false
            }
        }
    }

    /// Requests the socket be closed.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Whether the connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once the connection is closed.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    /// Clone of the close token, for tasks that outlive a borrow of the handle.
    pub fn close_token(&self) -> CancellationToken {
        self.closed.clone()
    }
}
