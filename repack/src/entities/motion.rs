use crate::entities::RectId;
use crate::geometry::{Coord, Point};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Which of the two nodes created by a merge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildSlot {
    Top,
    Bottom,
}

/// Structural address of an outline node: the rectangle whose merge created it and which child it is.
/// Unlike a [`NodeKey`](crate::outline::NodeKey), it survives the node being split away and merged again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// `None` for the two root nodes
    pub parent: Option<RectId>,
    pub slot: ChildSlot,
}

impl Anchor {
    /// The root node at `(0, 0)`
    pub const ORIGIN: Anchor = Anchor {
        parent: None,
        slot: ChildSlot::Bottom,
    };

    /// The primary terminal
    pub const TERMINAL: Anchor = Anchor {
        parent: None,
        slot: ChildSlot::Top,
    };
}

/// Ranking key of a [`Motion`], compared lexicographically. Smaller is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Assessment {
    /// Growth of the half perimeter of the content bounding box
    pub growth: Coord,
    /// Coordinate sum of the node the motion merges at
    pub corner: Coord,
    /// Fraction of the node's slot the rectangle fills, fuller is better
    pub fill: Reverse<OrderedFloat<f64>>,
    /// Lower-left corner of the placed rectangle, lowest first, then leftmost
    pub at: (Coord, Coord),
    pub rotated: bool,
}

impl Assessment {
    pub fn new(growth: Coord, corner: Coord, fill_rate: f64, at: Point, rotated: bool) -> Self {
        Assessment {
            growth,
            corner,
            fill: Reverse(OrderedFloat(fill_rate)),
            at: (at.y(), at.x()),
            rotated,
        }
    }
}

/// Candidate placement of a rectangle at a node, in a given orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Motion {
    pub rect: RectId,
    pub anchor: Anchor,
    pub rotated: bool,
    pub assessment: Assessment,
}
