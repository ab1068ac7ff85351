use crate::entities::RectId;
use crate::geometry::{Coord, Point};
use crate::outline::{Direction, Junction, NodeKey, Outline, Shape};
use crate::util::assertions;
use anyhow::{Context, Result, bail, ensure};
use log::debug;
use std::collections::HashSet;

/// Outcome of a committed merge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Merged {
    /// Bottom-left corner of the placed rectangle
    pub anchor: Point,
    pub top: NodeKey,
    pub bottom: NodeKey,
    pub shape: Shape,
}

impl Outline {
    /// Merges a `width` x `height` rectangle into the outline at `key`.
    ///
    /// Two nodes are created as children of `key`: `top` above the rectangle's top-left corner and
    /// `bottom` right of its bottom-right corner. A valley merge replaces `key` by the pair.
    /// A wall merge drops onto the floor under `key` and a floor merge slides against the wall left
    /// of `key`. Both cut a cavity off the cycle, which `key` keeps closing as a new hanger.
    pub fn merge(
        &mut self,
        key: NodeKey,
        width: Coord,
        height: Coord,
        rect: RectId,
    ) -> Result<Merged> {
        ensure!(
            self.is_mergeable(key, width, height),
            "node {key:?} at {} cannot take a {width}x{height} rectangle",
            self.pos(key)
        );
        let shape = self.shape(key);
        let anchor = self.frame(key).context("mergeable node without frame")?.anchor;

        // the outer neighbours the new pair is spliced between
        let (before, after) = match shape {
            Shape::Valley => (self.prev(key), self.next(key)),
            Shape::Wall => {
                let floor = self.extent(key, Direction::Down);
                (self.prev(key), self.next(floor))
            }
            Shape::Floor => {
                let wall = self.extent(key, Direction::Left);
                (self.prev(wall), self.next(key))
            }
            Shape::Terminal => bail!("terminal node {key:?} cannot be merged"),
        };

        let top = self.insert(Point(anchor.x(), anchor.y() + height), Some(key));
        let bottom = self.insert(Point(anchor.x() + width, anchor.y()), Some(key));

        let mut fresh = HashSet::from([before, top, bottom, after]);
        match shape {
            Shape::Wall => {
                // close the cavity under the wall: key -> ... -> floor -> key
                let floor = self.extent(key, Direction::Down);
                self.splice(before, top, bottom, after);
                self.link(floor, key);
                self.hangers.register(key);
                fresh.extend([floor, key]);
            }
            Shape::Floor => {
                // close the cavity left of the floor: key -> wall -> ... -> key
                let wall = self.extent(key, Direction::Left);
                self.splice(before, top, bottom, after);
                self.link(key, wall);
                self.hangers.register(key);
                fresh.extend([key, wall]);
            }
            _ => self.splice(before, top, bottom, after),
        }
        self.nodes[key].junction = Some(Junction {
            top,
            bottom,
            shape,
            rect,
        });

        let hanger = self
            .hanger_of(top)
            .context("merged pair is not on a registered cycle")?;
        self.refresh(hanger, &fresh);
        if shape != Shape::Valley {
            self.refresh(key, &fresh);
        }

        debug!(
            "[OUTLINE] merged {width}x{height} at {anchor} via {shape:?} node {key:?} ({} hangers)",
            self.hangers.len()
        );
        debug_assert!(assertions::outline_is_consistent(self));

        Ok(Merged {
            anchor,
            top,
            bottom,
            shape,
        })
    }
}
