// Gameplay tuning. Keep this separate from runtime/server configuration.

pub mod arena;
pub mod player;
pub mod projectile;

pub use arena::ArenaTuning;
pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;

/// All gameplay tuning bundled for the world store and simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
}
