// The canonical world store: every connected player and in-flight projectile.
//
// Callers hold the `SharedWorld` lock around every operation here: the write guard for
// mutations, the read guard for `snapshot` and `recipients`.

use super::ports::ClientSink;
use super::state::{Player, PlayerId, Projectile, ProjectileId, WorldSnapshot};
use super::tuning::ArenaTuning;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedWorld = Arc<RwLock<World>>;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("identity already present: {0}")]
    DuplicateIdentity(String),
}

#[derive(Debug, Default)]
pub struct World {
    pub arena: ArenaTuning,
    // Ordered maps keep iteration (and so collision tie-breaks) deterministic.
    pub players: BTreeMap<PlayerId, Player>,
    pub projectiles: BTreeMap<ProjectileId, Projectile>,
}

impl World {
    pub fn new(arena: ArenaTuning) -> Self {
        Self {
            arena,
            players: BTreeMap::new(),
            projectiles: BTreeMap::new(),
        }
    }

    pub fn into_shared(self) -> SharedWorld {
        Arc::new(RwLock::new(self))
    }

    pub fn insert_entity(&mut self, player: Player) -> Result<(), WorldError> {
        if self.players.contains_key(&player.id) {
            return Err(WorldError::DuplicateIdentity(player.id));
        }
        self.players.insert(player.id.clone(), player);
        Ok(())
    }

    /// Removes a player if present. Returns the removed record.
    pub fn remove_entity(&mut self, id: &str) -> Option<Player> {
        self.players.remove(id)
    }

    /// Moves a player, applying each axis only if it lies inside the movement bounds.
    /// Returns false if the player is absent.
    pub fn update_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let arena = self.arena;
        let Some(player) = self.players.get_mut(id) else {
            return false;
        };

        // NaN fails both range checks and is dropped here too.
        if arena.accepts_x(x) {
            player.x = x;
        }
        if arena.accepts_y(y) {
            player.y = y;
        }
        true
    }

    /// Stores the raw aim angle; angles wrap naturally so no normalization happens.
    pub fn update_aim(&mut self, id: &str, angle: f64) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.angle = angle;
                true
            }
            None => false,
        }
    }

    pub fn insert_projectile(&mut self, projectile: Projectile) -> Result<(), WorldError> {
        if self.projectiles.contains_key(&projectile.id) {
            return Err(WorldError::DuplicateIdentity(projectile.id));
        }
        self.projectiles.insert(projectile.id.clone(), projectile);
        Ok(())
    }

    pub fn remove_projectile(&mut self, id: &str) -> Option<Projectile> {
        self.projectiles.remove(id)
    }

    /// Copies the client-visible fields of every player and projectile.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            players: self
                .players
                .iter()
                .map(|(id, p)| (id.clone(), p.into()))
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|(id, p)| (id.clone(), p.into()))
                .collect(),
        }
    }

    /// Outbound channels of every connected player, paired with the player id.
    pub fn recipients(&self) -> Vec<(PlayerId, Arc<dyn ClientSink>)> {
        self.players
            .values()
            .map(|p| (p.id.clone(), Arc::clone(&p.sink)))
            .collect()
    }
}
