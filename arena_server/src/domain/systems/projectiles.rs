use crate::domain::state::{PlayerId, ProjectileId};
use crate::domain::tuning::ProjectileTuning;
use crate::domain::world::World;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub projectile_id: ProjectileId,
    pub shooter_id: PlayerId,
    pub victim_id: PlayerId,
    pub victim_hp: i32,
    pub eliminated: bool,
}

/// What one simulation step did to the world.
#[derive(Debug, Default)]
pub struct TickReport {
    pub hits: Vec<Hit>,
    pub out_of_bounds: Vec<ProjectileId>,
}

impl TickReport {
    pub fn removed(&self) -> usize {
        self.hits.len() + self.out_of_bounds.len()
    }
}

/// Advances every projectile by `dt` seconds and resolves hits.
///
/// Each projectile is removed at most once per step: either it left the arena or it hit the
/// first eligible player in ascending id order. Eliminated players stay in the world but no
/// longer take damage.
pub fn tick_projectiles(world: &mut World, dt: f64, cfg: ProjectileTuning) -> TickReport {
    let mut report = TickReport::default();
    let arena = world.arena;
    let World {
        players,
        projectiles,
        ..
    } = world;

    for p in projectiles.values_mut() {
        p.x += p.vx * dt;
        p.y += p.vy * dt;

        if !arena.contains(p.x, p.y) {
            report.out_of_bounds.push(p.id.clone());
            continue;
        }

        // Naive O(P*E) scan; first hit wins.
        for e in players.values_mut() {
            if !e.is_alive() || e.id == p.owner_id {
                continue;
            }

            let dx = p.x - e.x;
            let dy = p.y - e.y;
            if (dx * dx + dy * dy).sqrt() < cfg.hit_radius {
                let eliminated = e.take_damage(cfg.damage);
                info!(
                    victim_id = %e.id,
                    shooter_id = %p.owner_id,
                    projectile_id = %p.id,
                    victim_hp = e.hp,
                    "player hit"
                );
                if eliminated {
                    info!(victim_id = %e.id, shooter_id = %p.owner_id, "player eliminated");
                }

                report.hits.push(Hit {
                    projectile_id: p.id.clone(),
                    shooter_id: p.owner_id.clone(),
                    victim_id: e.id.clone(),
                    victim_hp: e.hp,
                    eliminated,
                });
                break;
            }
        }
    }

    for id in report
        .out_of_bounds
        .iter()
        .chain(report.hits.iter().map(|h| &h.projectile_id))
    {
        projectiles.remove(id);
    }

    report
}
