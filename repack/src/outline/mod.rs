mod extents;
mod frame;
mod free_space;
mod hangers;
mod merge;
mod node;
mod shape;
mod split;

#[doc(inline)]
pub use frame::{Frame, Slot};
#[doc(inline)]
pub use hangers::HangerRegistry;
#[doc(inline)]
pub use merge::Merged;
#[doc(inline)]
pub use node::{Direction, Extents, Junction, Node, NodeKey};
#[doc(inline)]
pub use shape::{Shape, classify};
#[doc(inline)]
pub use split::Detachment;

use crate::geometry::{Coord, Point};
use crate::util::assertions;
use anyhow::{Result, ensure};
use log::debug;
use slotmap::SlotMap;
use std::collections::HashSet;

/// Arena of outline nodes, threaded into one boundary cycle per registered hanger.
///
/// The primary cycle starts at the terminal node in the top-right corner of the scene and runs
/// counter-clockwise around the free region: every node is followed by a horizontal run at its own
/// height towards the next node's x, and every node is entered by a vertical run at its own x.
/// Free space is always to the left of the direction of travel.
#[derive(Clone, Debug)]
pub struct Outline {
    nodes: SlotMap<NodeKey, Node>,
    hangers: HangerRegistry,
    top: NodeKey,
    origin: NodeKey,
    x_max: Coord,
    y_max: Coord,
    /// Nodes collapsed by splits, kept until [`Outline::recycle`]
    retired: Vec<NodeKey>,
}

impl Outline {
    /// Creates the outline of an empty `x_max` x `y_max` scene: the terminal at the top-right corner
    /// and the origin, linked into a two-node cycle.
    pub fn new(x_max: Coord, y_max: Coord) -> Result<Self> {
        ensure!(
            x_max > 0 && y_max > 0,
            "scene bounds must be positive, got {x_max}x{y_max}"
        );
        let mut nodes = SlotMap::with_key();
        let top = nodes.insert(Node::new(Point(x_max, y_max), None));
        let origin = nodes.insert(Node::new(Point(0, 0), None));

        let mut outline = Outline {
            nodes,
            hangers: HangerRegistry::new(top),
            top,
            origin,
            x_max,
            y_max,
            retired: vec![],
        };
        outline.link(top, origin);
        outline.link(origin, top);
        outline.relink(top);

        debug_assert!(assertions::outline_is_consistent(&outline));
        Ok(outline)
    }

    pub fn node(&self, key: NodeKey) -> &Node {
        &self.nodes[key]
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn pos(&self, key: NodeKey) -> Point {
        self.nodes[key].pos
    }

    pub fn prev(&self, key: NodeKey) -> NodeKey {
        self.nodes[key].prev
    }

    pub fn next(&self, key: NodeKey) -> NodeKey {
        self.nodes[key].next
    }

    pub fn extent(&self, key: NodeKey, dir: Direction) -> NodeKey {
        self.nodes[key].extents.get(dir)
    }

    /// The primary hanger, closing the outer boundary of the scene
    pub fn top(&self) -> NodeKey {
        self.top
    }

    /// The root node at `(0, 0)`
    pub fn origin(&self) -> NodeKey {
        self.origin
    }

    pub fn bounds(&self) -> (Coord, Coord) {
        (self.x_max, self.y_max)
    }

    pub fn hangers(&self) -> &HangerRegistry {
        &self.hangers
    }

    /// Number of nodes in the arena, retired ones included
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_retired(&self) -> usize {
        self.retired.len()
    }

    /// Walks the cycle containing `start` once, starting with `start` itself.
    pub fn walk(&self, start: NodeKey) -> Walk<'_> {
        Walk {
            outline: self,
            start,
            cursor: Some(start),
            budget: self.nodes.len(),
        }
    }

    /// Shape of a linked node. Registered hangers are always [`Shape::Terminal`].
    pub fn shape(&self, key: NodeKey) -> Shape {
        if self.hangers.contains(key) {
            return Shape::Terminal;
        }
        let node = &self.nodes[key];
        classify(self.pos(node.prev), node.pos, self.pos(node.next))
    }

    /// The hanger closing the cycle that contains `key`
    pub fn hanger_of(&self, key: NodeKey) -> Option<NodeKey> {
        self.walk(key).find(|&k| self.hangers.contains(k))
    }

    /// Maximum coordinates over the primary cycle, terminal included
    pub fn envelope(&self) -> (Coord, Coord) {
        self.walk(self.top).fold((0, 0), |(x, y), k| {
            let pos = self.pos(k);
            (x.max(pos.x()), y.max(pos.y()))
        })
    }

    /// Moves the primary terminal to `(x_max, y_max)`, resizing the scene.
    /// Fails if a node of the outline would end up outside of the new bounds.
    pub fn refit(&mut self, x_max: Coord, y_max: Coord) -> Result<()> {
        ensure!(
            x_max > 0 && y_max > 0,
            "scene bounds must be positive, got {x_max}x{y_max}"
        );
        let (x_reach, y_reach) = self
            .nodes
            .iter()
            .filter(|(k, n)| *k != self.top && !n.retired)
            .fold((0, 0), |(x, y), (_, n)| (x.max(n.pos.x()), y.max(n.pos.y())));
        ensure!(
            x_reach <= x_max && y_reach <= y_max,
            "cannot refit scene to {x_max}x{y_max}, outline reaches {x_reach}x{y_reach}"
        );

        self.nodes[self.top].pos = Point(x_max, y_max);
        self.x_max = x_max;
        self.y_max = y_max;
        // both runs at the terminal moved, and with them the runs of its neighbours
        let fresh = HashSet::from([self.prev(self.top), self.top, self.next(self.top)]);
        self.refresh(self.top, &fresh);

        debug!("[OUTLINE] refitted scene to {x_max}x{y_max}");
        debug_assert!(assertions::outline_is_consistent(self));
        Ok(())
    }

    /// Drops all retired nodes from the arena, returns how many were dropped.
    /// Any [`Detachment`] still referring to them can no longer be reattached.
    pub fn recycle(&mut self) -> usize {
        let n_retired = self.retired.len();
        for key in self.retired.drain(..) {
            self.nodes.remove(key);
        }
        n_retired
    }

    pub(crate) fn insert(&mut self, pos: Point, parent: Option<NodeKey>) -> NodeKey {
        self.nodes.insert(Node::new(pos, parent))
    }

    pub(crate) fn link(&mut self, a: NodeKey, b: NodeKey) {
        self.nodes[a].next = b;
        self.nodes[b].prev = a;
    }

    /// Links `before -> top -> bottom -> after`
    fn splice(&mut self, before: NodeKey, top: NodeKey, bottom: NodeKey, after: NodeKey) {
        self.link(before, top);
        self.link(top, bottom);
        self.link(bottom, after);
    }

    fn retire(&mut self, key: NodeKey) {
        self.nodes[key].retired = true;
        self.retired.push(key);
    }

    fn revive(&mut self, key: NodeKey) {
        self.nodes[key].retired = false;
        self.retired.retain(|&k| k != key);
    }
}

/// Iterator over one boundary cycle, see [`Outline::walk`].
/// Bounded by the arena size, so it ends even on a corrupted cycle.
#[derive(Clone)]
pub struct Walk<'a> {
    outline: &'a Outline,
    start: NodeKey,
    cursor: Option<NodeKey>,
    budget: usize,
}

impl Iterator for Walk<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.cursor?;
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;
        let next = self.outline.nodes[key].next;
        self.cursor = (next != self.start).then_some(next);
        Some(key)
    }
}
