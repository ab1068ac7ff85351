use crate::geometry::{Coord, Point, Rect};
use crate::outline::NodeKey;
use anyhow::{Result, ensure};

/// Index of a rectangle in the ordered collection of a [`Scene`](crate::entities::Scene)
pub type RectId = usize;

/// A rectangle to be packed, together with its placement state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rectangle {
    pub id: RectId,
    pub width: Coord,
    pub height: Coord,
    /// Rotated by 90 degrees: width and height are swapped when placed
    pub rotated: bool,
    /// Bottom-left corner, only while placed
    pub position: Option<Point>,
    /// Node whose merge placed this rectangle, only while placed
    pub owner: Option<NodeKey>,
    /// Owner before the last removal
    pub last_owner: Option<NodeKey>,
}

impl Rectangle {
    pub fn try_new(id: RectId, width: Coord, height: Coord) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "rectangle {id} has invalid dimensions {width}x{height}"
        );
        Ok(Rectangle {
            id,
            width,
            height,
            rotated: false,
            position: None,
            owner: None,
            last_owner: None,
        })
    }

    /// Width and height as placed in the given orientation
    pub fn oriented(&self, rotated: bool) -> (Coord, Coord) {
        match rotated {
            false => (self.width, self.height),
            true => (self.height, self.width),
        }
    }

    /// Width and height in the current orientation
    pub fn dims(&self) -> (Coord, Coord) {
        self.oriented(self.rotated)
    }

    pub fn area(&self) -> Coord {
        self.width * self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn is_placed(&self) -> bool {
        self.owner.is_some()
    }

    /// Occupied area of the scene, while placed
    pub fn footprint(&self) -> Option<Rect> {
        let (width, height) = self.dims();
        self.position.map(|p| Rect {
            x_min: p.x(),
            y_min: p.y(),
            x_max: p.x() + width,
            y_max: p.y() + height,
        })
    }
}
