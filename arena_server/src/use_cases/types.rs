// Use-case level inputs/outputs for player sessions.

/// A decoded client command. Unknown kinds are kept so callers can log them.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move { x: f64, y: f64 },
    Shoot { angle: f64 },
    Unknown(String),
}

/// Whether a command changed the world (and was therefore broadcast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Ignored,
}
