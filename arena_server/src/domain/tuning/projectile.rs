/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Projectile speed in world units per second.
    pub speed: f64,

    /// Distance below which a projectile hits a player center.
    pub hit_radius: f64,

    /// Health removed from a player per hit.
    pub damage: i32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 200.0,
            hit_radius: 20.0,
            damage: 1,
        }
    }
}
