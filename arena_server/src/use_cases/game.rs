use crate::domain::SharedWorld;
use crate::domain::ports::Broadcaster;
use crate::domain::systems::projectiles;
use crate::domain::tuning::ProjectileTuning;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Drives the fixed-step simulation until `shutdown` is notified.
///
/// Every period the world advances by `step_seconds` under the write lock, then one broadcast
/// goes out. Late periods are skipped rather than replayed.
pub async fn world_task(
    world: SharedWorld,
    broadcaster: Arc<dyn Broadcaster>,
    tick_interval: Duration,
    step_seconds: f64,
    projectile_tuning: ProjectileTuning,
    shutdown: Arc<Notify>,
) {
    let mut tick: u64 = 0;
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        tick_interval_ms = tick_interval.as_millis() as u64,
        step_seconds, "simulation started"
    );

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(tick, "simulation stopped");
                break;
            }
            _ = interval.tick() => {}
        }

        let report = {
            let mut world = world.write().await;
            projectiles::tick_projectiles(&mut world, step_seconds, projectile_tuning)
        };
        tick += 1;

        if report.removed() > 0 {
            debug!(
                tick,
                hits = report.hits.len(),
                out_of_bounds = report.out_of_bounds.len(),
                "projectiles removed"
            );
        }

        broadcaster.broadcast().await;
    }
}
