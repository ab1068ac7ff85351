use crate::entities::RectId;
use crate::geometry::Point;
use crate::outline::Shape;
use slotmap::new_key_type;

new_key_type! {
    /// Key to identify nodes in the [`Outline`](crate::outline::Outline) arena
    pub struct NodeKey;
}

/// The four directions in which a node keeps a reference to the nearest boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Nearest boundary node in every direction, as seen from one node.
/// A node that sees no boundary in a direction refers to itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Extents {
    pub left: NodeKey,
    pub right: NodeKey,
    pub up: NodeKey,
    pub down: NodeKey,
}

impl Extents {
    pub fn get(&self, dir: Direction) -> NodeKey {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn iter(&self) -> std::array::IntoIter<NodeKey, 4> {
        [self.left, self.right, self.up, self.down].into_iter()
    }
}

/// Record of the merge committed at a node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Junction {
    /// Node created above the top-left corner of the placed rectangle
    pub top: NodeKey,
    /// Node created right of the bottom-right corner of the placed rectangle
    pub bottom: NodeKey,
    /// Shape of the node at the time of the merge
    pub shape: Shape,
    pub rect: RectId,
}

/// A turning of the outline
#[derive(Clone, Debug)]
pub struct Node {
    pub pos: Point,
    pub prev: NodeKey,
    pub next: NodeKey,
    pub extents: Extents,
    /// Node whose merge created this one, `None` for the two root nodes
    pub parent: Option<NodeKey>,
    pub junction: Option<Junction>,
    /// Set when a split collapsed this node. Retired nodes stay in the arena until recycled.
    pub retired: bool,
}

impl Node {
    pub(crate) fn new(pos: Point, parent: Option<NodeKey>) -> Self {
        Node {
            pos,
            prev: NodeKey::default(),
            next: NodeKey::default(),
            extents: Extents::default(),
            parent,
            junction: None,
            retired: false,
        }
    }

    pub fn children(&self) -> Option<[NodeKey; 2]> {
        self.junction.map(|j| [j.top, j.bottom])
    }

    /// True if no merge was committed at this node
    pub fn is_leaf(&self) -> bool {
        self.junction.is_none()
    }

    /// The rectangle anchored at this node, if any
    pub fn rect(&self) -> Option<RectId> {
        self.junction.map(|j| j.rect)
    }
}
