// Session lifecycle for one connected player: join, commands, leave.

use super::types::{Command, CommandOutcome};
use crate::domain::ports::{Broadcaster, ClientSink};
use crate::domain::state::{PlayerId, Projectile};
use crate::domain::tuning::Tuning;
use crate::domain::{Player, SharedWorld, WorldError};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    World(#[from] WorldError),
}

pub struct Session {
    player_id: PlayerId,
    world: SharedWorld,
    broadcaster: Arc<dyn Broadcaster>,
    tuning: Tuning,
}

impl Session {
    /// Spawns the player into the world and announces it to everyone.
    ///
    /// The caller is expected to have delivered the welcome message on `sink` already, so the
    /// first world update this client sees can never precede it.
    pub async fn join(
        player_id: PlayerId,
        sink: Arc<dyn ClientSink>,
        world: SharedWorld,
        broadcaster: Arc<dyn Broadcaster>,
        tuning: Tuning,
    ) -> Result<Self, SessionError> {
        let player = Player::spawn(player_id.clone(), &tuning, sink);
        let (x, y, color) = (player.x, player.y, player.color);
        world.write().await.insert_entity(player)?;
        info!(player_id = %player_id, x, y, color, "player spawned");

        broadcaster.broadcast().await;

        Ok(Self {
            player_id,
            world,
            broadcaster,
            tuning,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Applies one client command. Every command that mutates the world is followed by exactly
    /// one broadcast.
    pub async fn apply(&self, command: Command) -> CommandOutcome {
        let outcome = match command {
            Command::Move { x, y } => {
                self.world
                    .write()
                    .await
                    .update_position(&self.player_id, x, y);
                // Always broadcast, even if the move was rejected, so the client snaps back.
                CommandOutcome::Applied
            }
            Command::Shoot { angle } => self.shoot(angle).await,
            Command::Unknown(kind) => {
                debug!(player_id = %self.player_id, kind = %kind, "unknown command ignored");
                return CommandOutcome::Ignored;
            }
        };

        if outcome == CommandOutcome::Applied {
            self.broadcaster.broadcast().await;
        }
        outcome
    }

    async fn shoot(&self, angle: f64) -> CommandOutcome {
        let mut world = self.world.write().await;
        let projectile = match world.players.get(&self.player_id) {
            Some(shooter) if shooter.is_alive() => {
                Projectile::fire(shooter, angle, self.tuning.projectile.speed)
            }
            _ => return CommandOutcome::Ignored,
        };

        world.update_aim(&self.player_id, angle);
        match world.insert_projectile(projectile) {
            Ok(()) => CommandOutcome::Applied,
            Err(e) => {
                // Projectile ids come from a process-wide counter; a clash means a bug.
                tracing::error!(player_id = %self.player_id, error = %e, "projectile not inserted");
                CommandOutcome::Ignored
            }
        }
    }

    /// Removes the player and announces the departure. Safe to call after the player is gone.
    pub async fn leave(self) {
        let removed = self.world.write().await.remove_entity(&self.player_id);
        if removed.is_some() {
            info!(player_id = %self.player_id, "player removed");
        }
        self.broadcaster.broadcast().await;
    }
}
