use async_trait::async_trait;
use axum::extract::ws::Utf8Bytes;

/// Errors reported by an outbound client channel.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("client channel closed")]
    Closed,
    // The client is not keeping up; this frame was dropped.
    #[error("client outbound queue full")]
    Full,
}

/// Port for a single client's outbound channel.
///
/// `send_text` only queues the frame and never waits on the network, so a client that stops
/// reading cannot hold up the caller. Implementations keep frames for one client in order.
pub trait ClientSink: Send + Sync {
    fn send_text(&self, text: Utf8Bytes) -> Result<(), SinkError>;
}

/// Delivery counts for one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    // Skipped because the client's queue was full; the next update carries the whole world.
    pub dropped: usize,
    pub failed: usize,
}

// Port for pushing the current world to every connected client.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self) -> BroadcastReport;
}
