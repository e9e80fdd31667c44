pub mod projectiles;
