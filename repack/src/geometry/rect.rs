use crate::geometry::{Coord, Point};
use anyhow::Result;
use anyhow::ensure;

///Axis-aligned rectangle on the integer grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x_min: Coord,
    pub y_min: Coord,
    pub x_max: Coord,
    pub y_max: Coord,
}

impl Rect {
    pub fn try_new(x_min: Coord, y_min: Coord, x_max: Coord, y_max: Coord) -> Result<Self> {
        ensure!(
            x_min < x_max && y_min < y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Rectangle with its bottom-left corner at `anchor`
    pub fn from_anchor(anchor: Point, width: Coord, height: Coord) -> Result<Self> {
        Rect::try_new(
            anchor.x(),
            anchor.y(),
            anchor.x() + width,
            anchor.y() + height,
        )
    }

    /// Bottom-left and top-right corners
    pub fn corners(&self) -> (Point, Point) {
        (
            Point(self.x_min, self.y_min),
            Point(self.x_max, self.y_max),
        )
    }

    /// True if the interiors of both rectangles overlap. Touching edges do not collide.
    #[inline(always)]
    pub fn collides_with(&self, other: &Rect) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.y_min < other.y_max
            && other.y_min < self.y_max
    }

    /// True if the rectangle lies within `[0, x_max] x [0, y_max]`
    pub fn is_within(&self, x_max: Coord, y_max: Coord) -> bool {
        self.x_min >= 0 && self.y_min >= 0 && self.x_max <= x_max && self.y_max <= y_max
    }
}
