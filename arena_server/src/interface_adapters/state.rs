use crate::domain::SharedWorld;
use crate::domain::ports::Broadcaster;
use crate::domain::tuning::Tuning;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // The single authoritative world shared by every connection and the tick task.
    pub world: SharedWorld,
    // Fan-out used after every mutating command.
    pub broadcaster: Arc<dyn Broadcaster>,
    // Gameplay tuning applied to new players and projectiles.
    pub tuning: Tuning,
    // Frames a client may have queued before further world updates are dropped for it.
    pub outbound_capacity: usize,
}
