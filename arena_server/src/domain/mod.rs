// Domain layer: core simulation types and rules.

pub mod ids;
pub mod ports;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

pub use state::{Player, PlayerView, Projectile, ProjectileView, WorldSnapshot};
pub use world::{SharedWorld, World, WorldError};
