// Domain-level world records and the snapshot types copied out for clients.

use super::ids;
use super::ports::ClientSink;
use super::tuning::Tuning;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type PlayerId = String;
pub type ProjectileId = String;

pub struct Player {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub color: &'static str,

    // Combat state.
    pub hp: i32,
    pub max_hp: i32,

    // Outbound channel (never part of a snapshot).
    pub sink: Arc<dyn ClientSink>,
}

impl Player {
    /// Creates a full-health player at a random spawn point with a random palette color.
    pub fn spawn(id: PlayerId, tuning: &Tuning, sink: Arc<dyn ClientSink>) -> Self {
        let mut rng = rand::thread_rng();
        let arena = tuning.arena;
        let x = rng.gen_range(arena.spawn_margin..arena.width - arena.spawn_margin);
        let y = rng.gen_range(arena.spawn_margin..arena.height - arena.spawn_margin);
        let palette = tuning.player.palette;
        let color = palette[rng.gen_range(0..palette.len())];

        Self {
            id,
            x,
            y,
            angle: 0.0,
            color,
            hp: tuning.player.max_hp,
            max_hp: tuning.player.max_hp,
            sink,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies damage, flooring health at zero. Returns true if this hit eliminated the player.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        let was_alive = self.is_alive();
        self.hp = (self.hp - damage).clamp(0, self.max_hp);
        was_alive && !self.is_alive()
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("angle", &self.angle)
            .field("color", &self.color)
            .field("hp", &self.hp)
            .field("max_hp", &self.max_hp)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    // Non-owning tag; only used to skip self-hits.
    pub owner_id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: &'static str,
}

impl Projectile {
    /// Fires a projectile from the shooter's position along `angle` at `speed`.
    pub fn fire(shooter: &Player, angle: f64, speed: f64) -> Self {
        Self {
            id: ids::projectile_id(),
            owner_id: shooter.id.clone(),
            x: shooter.x,
            y: shooter.y,
            vx: speed * angle.cos(),
            vy: speed * angle.sin(),
            color: shooter.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub hp: i32,
    pub max_hp: i32,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub owner_id: PlayerId,
    pub color: &'static str,
}

/// Immutable copy of the client-visible world, built fresh for each broadcast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSnapshot {
    pub players: BTreeMap<PlayerId, PlayerView>,
    pub projectiles: BTreeMap<ProjectileId, ProjectileView>,
}

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            x: p.x,
            y: p.y,
            color: p.color,
            hp: p.hp,
            max_hp: p.max_hp,
            angle: p.angle,
        }
    }
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id.clone(),
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            owner_id: p.owner_id.clone(),
            color: p.color,
        }
    }
}
