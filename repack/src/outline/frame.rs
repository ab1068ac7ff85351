use crate::geometry::{Coord, Point, Rect};
use crate::outline::{Direction, NodeKey, Outline, Shape};

/// Free rectangle immediately available at a node, before gap checking
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub width: Coord,
    pub height: Coord,
}

impl Slot {
    pub fn area(&self) -> Coord {
        self.width * self.height
    }
}

/// Placement window of a node: where a rectangle would be anchored, the slot available from there
/// and the gap between the anchor and the node's governing wall or floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub anchor: Point,
    pub slot: Slot,
    pub x_gap: Coord,
    pub y_gap: Coord,
}

impl Frame {
    /// A rectangle is admitted if it spans the gap on both axes and fits the slot.
    /// Anything not spanning the gap would leave an unreachable sliver behind it.
    pub fn admits(&self, width: Coord, height: Coord) -> bool {
        self.x_gap < width
            && width <= self.slot.width
            && self.y_gap < height
            && height <= self.slot.height
    }

    /// Slot area left unused by a `width` x `height` rectangle
    pub fn leftover(&self, width: Coord, height: Coord) -> Coord {
        self.slot.area() - width * height
    }

    /// Fraction of the slot covered by a `width` x `height` rectangle
    pub fn fill_rate(&self, width: Coord, height: Coord) -> f64 {
        match self.slot.area() {
            0 => 0.0,
            area => (width * height) as f64 / area as f64,
        }
    }
}

impl Outline {
    /// Computes the frame of a linked node, `None` for terminals and for nodes already merged.
    pub fn frame(&self, key: NodeKey) -> Option<Frame> {
        let node = self.get(key)?;
        if node.retired || !node.is_leaf() {
            return None;
        }
        let pos = node.pos;
        let ext = |k: NodeKey, dir: Direction| self.pos(self.extent(k, dir));

        let frame = match self.shape(key) {
            Shape::Valley => Frame {
                anchor: pos,
                slot: Slot {
                    width: ext(key, Direction::Right).x() - pos.x(),
                    height: ext(key, Direction::Up).y() - pos.y(),
                },
                x_gap: 0,
                y_gap: 0,
            },
            Shape::Wall => {
                // the placement drops down to the floor under the wall
                let floor = self.extent(key, Direction::Down);
                let floor_y = self.pos(floor).y();
                Frame {
                    anchor: Point(pos.x(), floor_y),
                    slot: Slot {
                        width: ext(floor, Direction::Right).x() - pos.x(),
                        height: ext(key, Direction::Up).y() - floor_y,
                    },
                    x_gap: 0,
                    y_gap: pos.y() - floor_y,
                }
            }
            Shape::Floor => {
                // the placement slides left against the wall bounding the floor
                let wall = self.extent(key, Direction::Left);
                let wall_x = self.pos(wall).x();
                Frame {
                    anchor: Point(wall_x, pos.y()),
                    slot: Slot {
                        width: ext(key, Direction::Right).x() - wall_x,
                        height: ext(wall, Direction::Up).y() - pos.y(),
                    },
                    x_gap: pos.x() - wall_x,
                    y_gap: 0,
                }
            }
            Shape::Terminal => return None,
        };
        Some(frame)
    }

    /// The slot of a node, see [`Outline::frame`]
    pub fn slot(&self, key: NodeKey) -> Option<Slot> {
        self.frame(key).map(|f| f.slot)
    }

    /// True if a `width` x `height` rectangle can be merged at `key`.
    ///
    /// Requires a linked, unmerged, non-terminal node that does not coincide with a neighbour,
    /// whose frame admits the rectangle within the scene bounds. Wall and floor merges
    /// additionally need their governing floor or wall to lie beyond the adjacent neighbour.
    ///
    /// The frame only looks along two rays, so the rectangle must finally be [free](Outline::is_free).
    /// Where touching rectangles pinch a cycle, a ray can start on a placed edge and see
    /// space that is not there.
    pub fn is_mergeable(&self, key: NodeKey, width: Coord, height: Coord) -> bool {
        if width <= 0 || height <= 0 {
            return false;
        }
        let Some(frame) = self.frame(key) else {
            return false;
        };
        let node = self.node(key);
        if node.pos == self.pos(node.prev) || node.pos == self.pos(node.next) {
            return false;
        }
        let partner_ok = match self.shape(key) {
            Shape::Valley => true,
            Shape::Wall => {
                let floor = self.extent(key, Direction::Down);
                floor != key && floor != node.prev
            }
            Shape::Floor => {
                let wall = self.extent(key, Direction::Left);
                wall != key && wall != node.next
            }
            Shape::Terminal => false,
        };
        let admitted = partner_ok
            && frame.admits(width, height)
            && frame.leftover(width, height) >= 0
            && frame.anchor.x() >= 0
            && frame.anchor.y() >= 0
            && frame.anchor.x() + width <= self.x_max
            && frame.anchor.y() + height <= self.y_max;

        admitted
            && Rect::from_anchor(frame.anchor, width, height).is_ok_and(|r| self.is_free(&r))
    }
}
