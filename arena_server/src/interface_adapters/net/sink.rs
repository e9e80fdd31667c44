use crate::domain::ports::{ClientSink, SinkError};
use axum::extract::ws::{Message, Utf8Bytes};
use futures_util::{Sink, SinkExt};
use std::fmt::Display;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::debug;

/// Outbound handle for one client socket.
///
/// Frames go through a bounded queue drained by a dedicated writer task, which is the only
/// code touching the socket's write half. Command-driven and tick-driven broadcasts can race
/// without interleaving frames, and a client that stops reading only fills its own queue.
pub struct WsSink {
    tx: mpsc::Sender<Utf8Bytes>,
}

impl WsSink {
    /// Spawns the writer task for `socket` and returns the handle that feeds it.
    ///
    /// The writer closes the socket once every handle is dropped, and stops early on the first
    /// failed write. `capacity` must be non-zero.
    pub fn spawn<S>(socket: S, capacity: usize) -> (Self, JoinHandle<()>)
    where
        S: Sink<Message> + Unpin + Send + 'static,
        S::Error: Display,
    {
        let (tx, rx) = mpsc::channel(capacity);
        let writer = tokio::spawn(write_loop(socket, rx));
        (Self { tx }, writer)
    }
}

impl ClientSink for WsSink {
    fn send_text(&self, text: Utf8Bytes) -> Result<(), SinkError> {
        self.tx.try_send(text).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

async fn write_loop<S>(mut socket: S, mut rx: mpsc::Receiver<Utf8Bytes>)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(text) = rx.recv().await {
        if let Err(e) = socket.send(Message::Text(text)).await {
            // Dropping `rx` makes later sends report `Closed`.
            debug!(error = %e, "socket write failed; stopping writer");
            return;
        }
    }

    // Best-effort close; the peer may already be gone.
    if let Err(e) = socket.close().await {
        debug!(error = %e, "socket close error");
    }
}
