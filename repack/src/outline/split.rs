use crate::outline::{Junction, NodeKey, Outline, Shape};
use crate::util::assertions;
use anyhow::{Context, Result, bail, ensure};
use itertools::Itertools;
use log::debug;
use std::collections::{HashSet, VecDeque};

/// Seam closed by a split, enough to reopen it with the same nodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detachment {
    pub parent: NodeKey,
    pub junction: Junction,
    /// Node preceding the placement on the outer cycle
    pub before: NodeKey,
    /// Node following the placement on the outer cycle
    pub after: NodeKey,
    /// End of the cavity rejoined with the outer cycle: its last node for wall merges, its first for floor merges
    pub cavity_end: Option<NodeKey>,
}

impl Outline {
    /// True if the merge at `key` can be undone: both children are unmerged and consecutive on their cycle.
    pub fn is_splittable(&self, key: NodeKey) -> bool {
        let Some(node) = self.get(key) else {
            return false;
        };
        match node.junction {
            Some(Junction { top, bottom, .. }) if !node.retired => {
                self.node(top).is_leaf()
                    && self.node(bottom).is_leaf()
                    && !self.node(top).retired
                    && self.next(top) == bottom
            }
            _ => false,
        }
    }

    /// Undoes the merge at `key`, collapsing its children back into it.
    ///
    /// Children are retired, not dropped, so the returned [`Detachment`] can reopen the seam
    /// until the next [`Outline::recycle`].
    pub fn split(&mut self, key: NodeKey) -> Result<Detachment> {
        ensure!(self.is_splittable(key), "node {key:?} is not splittable");
        let junction = self.node(key).junction.context("splittable node without junction")?;
        let Junction { top, bottom, .. } = junction;
        let (before, after) = (self.prev(top), self.next(bottom));

        // nodes of a cavity rejoin the outer cycle, so all of their runs are new there
        let mut fresh = match junction.shape {
            Shape::Valley => HashSet::new(),
            _ => self.walk(key).collect::<HashSet<_>>(),
        };
        fresh.extend([before, key, after]);

        let cavity_end = match junction.shape {
            Shape::Valley => {
                self.link(before, key);
                self.link(key, after);
                None
            }
            Shape::Wall => {
                let last = self.prev(key);
                self.link(before, key);
                self.link(last, after);
                self.hangers.deregister(key);
                Some(last)
            }
            Shape::Floor => {
                let first = self.next(key);
                self.link(before, first);
                self.link(key, after);
                self.hangers.deregister(key);
                Some(first)
            }
            Shape::Terminal => bail!("junction of {key:?} records a terminal merge"),
        };
        self.nodes[key].junction = None;
        self.retire(top);
        self.retire(bottom);

        let hanger = self
            .hanger_of(key)
            .context("split node is not on a registered cycle")?;
        self.refresh(hanger, &fresh);

        debug!(
            "[OUTLINE] split {:?} node {key:?} at {}, rectangle {} released",
            junction.shape,
            self.pos(key),
            junction.rect
        );
        debug_assert!(assertions::outline_is_consistent(self));

        Ok(Detachment {
            parent: key,
            junction,
            before,
            after,
            cavity_end,
        })
    }

    /// Reopens the seam closed by a [`Split`](Outline::split), reviving the same child nodes.
    /// Fails if the outline around the seam changed since.
    pub fn reattach(&mut self, detachment: &Detachment) -> Result<()> {
        let Detachment {
            parent,
            junction,
            before,
            after,
            cavity_end,
        } = *detachment;
        let Junction { top, bottom, .. } = junction;

        ensure!(
            self.get(parent).is_some_and(|n| !n.retired && n.is_leaf()),
            "cannot reattach at {parent:?}, node is gone or merged"
        );
        ensure!(
            [top, bottom]
                .iter()
                .all(|&c| self.get(c).is_some_and(|n| n.retired)),
            "cannot reattach at {parent:?}, children were recycled"
        );
        let seam_intact = match (junction.shape, cavity_end) {
            (Shape::Valley, None) => self.next(before) == parent && self.next(parent) == after,
            (Shape::Wall, Some(last)) => self.next(before) == parent && self.next(last) == after,
            (Shape::Floor, Some(first)) => {
                self.next(before) == first && self.next(parent) == after
            }
            _ => bail!("malformed detachment {detachment:?}"),
        };
        ensure!(seam_intact, "seam around {parent:?} changed since the split");

        self.revive(top);
        self.revive(bottom);
        self.splice(before, top, bottom, after);
        let mut fresh = HashSet::from([before, top, bottom, after]);
        match (junction.shape, cavity_end) {
            (Shape::Wall, Some(last)) => {
                self.link(last, parent);
                self.hangers.register(parent);
                fresh.extend([last, parent]);
            }
            (Shape::Floor, Some(first)) => {
                self.link(parent, first);
                self.hangers.register(parent);
                fresh.extend([parent, first]);
            }
            _ => {}
        }
        self.nodes[parent].junction = Some(junction);

        let hanger = self
            .hanger_of(top)
            .context("reattached pair is not on a registered cycle")?;
        self.refresh(hanger, &fresh);
        if cavity_end.is_some() {
            self.refresh(parent, &fresh);
        }

        debug_assert!(assertions::outline_is_consistent(self));
        Ok(())
    }

    /// Splits every merge stacked under `key` and finally `key` itself, deepest placements first.
    ///
    /// Descendants are gathered breadth first with an explicit queue and split in reverse order,
    /// repeating passes over those not yet splittable. Fails if a pass makes no progress.
    pub fn cascade_split(&mut self, key: NodeKey) -> Result<Vec<Detachment>> {
        let mut queue = VecDeque::from([key]);
        let mut merged = vec![];
        while let Some(k) = queue.pop_front() {
            if let Some(children) = self.node(k).children() {
                merged.push(k);
                queue.extend(children);
            }
        }

        let mut pending = merged.into_iter().rev().collect_vec();
        let mut detachments = vec![];
        while !pending.is_empty() {
            let n_pending = pending.len();
            let mut blocked = vec![];
            for k in pending {
                match self.is_splittable(k) {
                    true => detachments.push(self.split(k)?),
                    false => blocked.push(k),
                }
            }
            ensure!(
                blocked.len() < n_pending,
                "cascaded split under {key:?} is stuck with {} merges left",
                blocked.len()
            );
            pending = blocked;
        }
        Ok(detachments)
    }
}
