use axum::extract::ws::Message;
use log::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{mpsc, watch};

/// Outbound queue slots per connection when no capacity is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// The producer-facing half of one WebSocket connection.
///
/// Owns the bounded outbound queue and the connection's lifecycle state
/// (`Open -> Closing -> Closed`). Any number of publishers may enqueue
/// concurrently; only the connection's own write pump dequeues. The socket
/// itself lives with the pumps, never with a registry.
pub struct Connection {
    id: ConnectionId,
    outbound: mpsc::Sender<Message>,
    shutdown: watch::Sender<bool>,
    closing: AtomicBool,
}

/// The consumer half handed to the write pump, exactly once per connection.
pub struct ConnectionReceiver {
    pub(crate) outbound: mpsc::Receiver<Message>,
    pub(crate) shutdown: watch::Receiver<bool>,
}

impl Connection {
    /// Create a connection with a bounded outbound queue of `capacity` slots.
    /// Returns the shared producer half and the receiver half for the write pump.
    pub fn channel(capacity: usize) -> (Arc<Self>, ConnectionReceiver) {
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let connection = Arc::new(Self {
            id: ConnectionId::new(),
            outbound: outbound_tx,
            shutdown: shutdown_tx,
            closing: AtomicBool::new(false),
        });

        let receiver = ConnectionReceiver {
            outbound: outbound_rx,
            shutdown: shutdown_rx,
        };

        (connection, receiver)
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Attempt a non-blocking push onto the outbound queue.
    ///
    /// Returns `false` when the queue is full or the connection is closing;
    /// the message is dropped, not retried (reject-newest backpressure). A
    /// slow consumer loses messages rather than stalling a publisher.
    pub fn enqueue(&self, message: Message) -> bool {
        if self.closing.load(Ordering::Acquire) {
            return false;
        }

        match self.outbound.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(
                    "Outbound queue full for connection {}, dropping message",
                    self.id.as_str()
                );
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Begin teardown. Idempotent: only the first call transitions the
    /// connection to `Closing` and wakes the write pump; repeated calls are
    /// no-ops. The write pump drains what is already queued, sends a close
    /// frame, and releases the socket.
    pub fn close(&self) {
        if !self.closing.swap(true, Ordering::AcqRel) {
            // The receiver may already be gone if the write pump exited on a
            // transport error first.
            let _ = self.shutdown.send(true);
        }
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }
}

impl ConnectionReceiver {
    /// Pop a queued message without blocking. Used by the write pump's drain
    /// phase and by tests observing delivery.
    pub fn try_recv(&mut self) -> Option<Message> {
        match self.outbound.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
