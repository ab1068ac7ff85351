use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Coordinate type of the packing grid, all positions and dimensions are integral
pub type Coord = i64;

/// Point on the integer grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point(pub Coord, pub Coord);

impl Point {
    #[inline(always)]
    pub fn x(&self) -> Coord {
        self.0
    }

    #[inline(always)]
    pub fn y(&self) -> Coord {
        self.1
    }

    /// Sum of both coordinates, the L1 distance to the origin for points in the first quadrant
    pub fn manhattan(&self) -> Coord {
        self.0 + self.1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
