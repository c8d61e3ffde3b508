//! Vertical bounds of a world.

use serde::{Deserialize, Serialize};

/// The inclusive range of y levels blocks may exist at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRange {
    /// Lowest valid y level.
    pub min_y: i32,
    /// Highest valid y level.
    pub max_y: i32,
}

impl WorldRange {
    /// The overworld range of current vanilla.
    pub const OVERWORLD: WorldRange = WorldRange::new(-64, 319);

    /// Creates a new range. `min_y` must not exceed `max_y`.
    #[must_use]
    pub const fn new(min_y: i32, max_y: i32) -> Self {
        Self { min_y, max_y }
    }

    /// Returns `true` if `y` lies within the range.
    #[must_use]
    pub const fn contains(&self, y: i32) -> bool {
        y >= self.min_y && y <= self.max_y
    }

    /// Number of block levels in the range.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

impl Default for WorldRange {
    fn default() -> Self {
        Self::OVERWORLD
    }
}
