use crate::geometry::{Coord, Point};
use crate::outline::{Extents, NodeKey, Outline};
use itertools::Itertools;
use log::trace;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Axis-parallel run of a boundary cycle.
/// Horizontal runs belong to the node they leave, vertical runs to the node they enter.
#[derive(Clone, Copy, Debug)]
struct Run {
    owner: NodeKey,
    /// y of a horizontal run, x of a vertical one
    level: Coord,
    from: Coord,
    to: Coord,
}

/// All non-degenerate runs of one cycle, in cycle order
struct Runs {
    horizontal: Vec<Run>,
    vertical: Vec<Run>,
}

impl Runs {
    fn trace(cycle: &[(NodeKey, Point)]) -> Self {
        let mut horizontal = vec![];
        let mut vertical = vec![];
        for (&(a, pa), &(b, pb)) in cycle.iter().circular_tuple_windows() {
            if pa.x() != pb.x() {
                horizontal.push(Run {
                    owner: a,
                    level: pa.y(),
                    from: pa.x(),
                    to: pb.x(),
                });
            }
            if pa.y() != pb.y() {
                vertical.push(Run {
                    owner: b,
                    level: pb.x(),
                    from: pa.y(),
                    to: pb.y(),
                });
            }
        }
        Runs {
            horizontal,
            vertical,
        }
    }

    /// The runs owned by nodes matching `pred`, order kept
    fn owned_by(&self, pred: impl Fn(NodeKey) -> bool) -> Self {
        Runs {
            horizontal: self.horizontal.iter().filter(|r| pred(r.owner)).copied().collect(),
            vertical: self.vertical.iter().filter(|r| pred(r.owner)).copied().collect(),
        }
    }

    /// Lowest westbound run at or above `pos`, covering the column just right of it
    fn up(&self, pos: Point) -> Option<&Run> {
        self.horizontal
            .iter()
            .filter(|r| r.to < r.from && r.to <= pos.x() && pos.x() < r.from)
            .filter(|r| r.level >= pos.y())
            .min_by_key(|r| r.level)
    }

    /// Highest eastbound run at or below `pos`, covering the column just left of it
    fn down(&self, pos: Point) -> Option<&Run> {
        self.horizontal
            .iter()
            .filter(|r| r.from < r.to && r.from < pos.x() && pos.x() <= r.to)
            .filter(|r| r.level <= pos.y())
            .min_by_key(|r| Reverse(r.level))
    }

    /// Nearest northbound run at or right of `pos`, covering the row just above it
    fn right(&self, pos: Point) -> Option<&Run> {
        self.vertical
            .iter()
            .filter(|r| r.from < r.to && r.from <= pos.y() && pos.y() < r.to)
            .filter(|r| r.level >= pos.x())
            .min_by_key(|r| r.level)
    }

    /// Nearest southbound run at or left of `pos`, covering the row just above it
    fn left(&self, pos: Point) -> Option<&Run> {
        self.vertical
            .iter()
            .filter(|r| r.to < r.from && r.to <= pos.y() && pos.y() < r.from)
            .filter(|r| r.level <= pos.x())
            .min_by_key(|r| Reverse(r.level))
    }

    /// Casts a ray from `key` at `pos` in every direction.
    /// Each extent is the owner of the first run hit, `key` itself on a miss.
    fn cast(&self, key: NodeKey, pos: Point) -> Extents {
        let owner = |run: Option<&Run>| run.map_or(key, |r| r.owner);
        Extents {
            left: owner(self.left(pos)),
            right: owner(self.right(pos)),
            up: owner(self.up(pos)),
            down: owner(self.down(pos)),
        }
    }
}

impl Outline {
    /// Extents of every node on the cycle closed by `hanger`, cast from scratch.
    ///
    /// Each extent is found by casting a ray from the node into the free region and taking the
    /// owner of the first run it hits. Ties go to the run met first walking from the hanger.
    pub(crate) fn ray_cast(&self, hanger: NodeKey) -> Vec<(NodeKey, Extents)> {
        let cycle = self
            .walk(hanger)
            .map(|k| (k, self.pos(k)))
            .collect_vec();
        let runs = Runs::trace(&cycle);
        cycle
            .iter()
            .map(|&(key, pos)| (key, runs.cast(key, pos)))
            .collect()
    }

    /// Recomputes the extents of every node on the cycle closed by `hanger`
    pub(crate) fn relink(&mut self, hanger: NodeKey) {
        for (key, extents) in self.ray_cast(hanger) {
            self.nodes[key].extents = extents;
        }
    }

    /// Brings the extents of the cycle closed by `hanger` up to date after an edit.
    ///
    /// `fresh` holds every node that was linked anew or moved in from another cycle: their runs
    /// are the only ones that can have appeared. A node is cast again only if it is fresh itself,
    /// if one of its extents lost its run, or if a fresh run comes at least as close as the
    /// run it currently refers to. All other extents still point at the first run they hit.
    /// The hanger of a newly closed cycle must be fresh: walks start from it, so it moved
    /// ahead of every run it may tie with.
    pub(crate) fn refresh(&mut self, hanger: NodeKey, fresh: &HashSet<NodeKey>) {
        let cycle = self
            .walk(hanger)
            .map(|k| (k, self.pos(k)))
            .collect_vec();
        let members = cycle.iter().map(|&(k, _)| k).collect::<HashSet<_>>();
        let is_fresh = |k: NodeKey| fresh.contains(&k);

        let runs = Runs::trace(&cycle);
        let renewed = runs.owned_by(is_fresh);

        let mut n_cast = 0;
        for &(key, pos) in &cycle {
            let current = self.nodes[key].extents;
            let lost = current
                .iter()
                .any(|e| !members.contains(&e) || is_fresh(e));
            if is_fresh(key) || lost || self.is_overtaken(key, pos, &current, &renewed) {
                self.nodes[key].extents = runs.cast(key, pos);
                n_cast += 1;
            }
        }
        trace!(
            "[OUTLINE] refreshed cycle of {hanger:?}: {n_cast}/{} nodes cast again, {} fresh runs",
            cycle.len(),
            renewed.horizontal.len() + renewed.vertical.len()
        );
    }

    /// True if a run of `renewed` ties with or beats one of the current extents of `key`
    fn is_overtaken(&self, key: NodeKey, pos: Point, current: &Extents, renewed: &Runs) -> bool {
        // level of the run an extent refers to, `None` for a miss
        let y_of = |e: NodeKey| (e != key).then(|| self.pos(e).y());
        let x_of = |e: NodeKey| (e != key).then(|| self.pos(e).x());

        renewed
            .up(pos)
            .is_some_and(|r| y_of(current.up).is_none_or(|l| r.level <= l))
            || renewed
                .down(pos)
                .is_some_and(|r| y_of(current.down).is_none_or(|l| r.level >= l))
            || renewed
                .right(pos)
                .is_some_and(|r| x_of(current.right).is_none_or(|l| r.level <= l))
            || renewed
                .left(pos)
                .is_some_and(|r| x_of(current.left).is_none_or(|l| r.level >= l))
    }
}
