// Use cases layer: application workflows for the arena server.

pub mod game;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use game::world_task;
pub use session::{Session, SessionError};
pub use types::{Command, CommandOutcome};
