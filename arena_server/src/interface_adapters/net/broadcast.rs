use crate::domain::SharedWorld;
use crate::domain::ports::{BroadcastReport, Broadcaster, SinkError};
use crate::interface_adapters::protocol::{GameStateDto, ServerMessage};
use async_trait::async_trait;
use axum::extract::ws::Utf8Bytes;
use tracing::{debug, error, warn};

/// Serializes the world once and queues it for every connected player.
pub struct SnapshotBroadcaster {
    world: SharedWorld,
}

impl SnapshotBroadcaster {
    pub fn new(world: SharedWorld) -> Self {
        Self { world }
    }
}

#[async_trait]
impl Broadcaster for SnapshotBroadcaster {
    async fn broadcast(&self) -> BroadcastReport {
        // One read lock covers both, so the recipients match the snapshot they receive.
        let (snapshot, recipients) = {
            let world = self.world.read().await;
            (world.snapshot(), world.recipients())
        };
        if recipients.is_empty() {
            return BroadcastReport::default();
        }

        let msg = ServerMessage::GameState(GameStateDto::from(&snapshot));
        let bytes = match serde_json::to_string(&msg) {
            Ok(txt) => Utf8Bytes::from(txt),
            Err(e) => {
                error!(error = ?e, "failed to serialize world update");
                return BroadcastReport::default();
            }
        };

        // Queuing never waits on a socket, so a slow client cannot hold up the caller.
        let mut report = BroadcastReport::default();
        for (player_id, sink) in &recipients {
            match sink.send_text(bytes.clone()) {
                Ok(()) => report.delivered += 1,
                Err(SinkError::Full) => {
                    debug!(player_id = %player_id, "client lagging; dropping world update");
                    report.dropped += 1;
                }
                Err(e) => {
                    // The client's own read loop will notice the dead socket and clean up.
                    warn!(player_id = %player_id, error = %e, "failed to send world update");
                    report.failed += 1;
                }
            }
        }
        report
    }
}
