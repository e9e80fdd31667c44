/// Gameplay tuning for the arena rectangle.

#[derive(Debug, Clone, Copy)]
pub struct ArenaTuning {
    /// Arena width in world units. Projectiles beyond `[0, width]` are despawned.
    pub width: f64,

    /// Arena height in world units. Projectiles beyond `[0, height]` are despawned.
    pub height: f64,

    /// Distance from each edge that player movement may not enter.
    pub move_margin: f64,

    /// Distance from each edge kept clear when picking a spawn point.
    pub spawn_margin: f64,
}

impl ArenaTuning {
    /// Returns true if `x` is an accepted player x coordinate.
    pub fn accepts_x(&self, x: f64) -> bool {
        x >= self.move_margin && x <= self.width - self.move_margin
    }

    /// Returns true if `y` is an accepted player y coordinate.
    pub fn accepts_y(&self, y: f64) -> bool {
        y >= self.move_margin && y <= self.height - self.move_margin
    }

    /// Returns true if the point lies inside the full arena rectangle (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            move_margin: 10.0,
            spawn_margin: 25.0,
        }
    }
}
