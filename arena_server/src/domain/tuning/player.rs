/// Gameplay tuning for player avatars.

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Health on spawn, also the upper bound for health.
    pub max_hp: i32,

    /// Colors a new player may be assigned. A fixed-size array, so it is never empty.
    pub palette: &'static [&'static str; PALETTE_SIZE],
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_hp: 5,
            palette: &PALETTE,
        }
    }
}

pub const PALETTE_SIZE: usize = 8;

pub const PALETTE: [&str; PALETTE_SIZE] = [
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#FFA500", "#800080",
];
