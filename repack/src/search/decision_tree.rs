use crate::entities::{Motion, RectId, Scene};
use crate::geometry::Coord;
use crate::search::assess;
use crate::util::SearchConfig;
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};
use std::cmp::Reverse;

/// One node of the [`DecisionTree`]
#[derive(Clone, Debug)]
struct Branch {
    /// Motion applied to reach this branch, `None` for the root
    motion: Option<Motion>,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Number of rectangles of the ordering placed once `motion` is applied
    depth: usize,
    visited: bool,
    /// Content bounding area once `motion` is applied, with the visit sequence number
    value: Option<(Coord, usize)>,
}

impl Branch {
    fn new(motion: Option<Motion>, parent: Option<usize>, depth: usize) -> Self {
        Branch {
            motion,
            parent,
            children: vec![],
            depth,
            visited: false,
            value: None,
        }
    }
}

/// Explicit tree over placement sequences of a fixed rectangle ordering.
///
/// Explored depth first with an explicit frontier: a branch applies its motion when first
/// visited, expands the ranked feasible motions of the next rectangle as children and reverts
/// its motion once all of them are done. Siblings are therefore always evaluated against the
/// same, fully restored, scene.
#[derive(Clone, Debug)]
pub struct DecisionTree {
    branches: Vec<Branch>,
    ordering: Vec<RectId>,
    config: SearchConfig,
}

impl DecisionTree {
    pub fn new(ordering: Vec<RectId>, config: SearchConfig) -> Self {
        DecisionTree {
            branches: vec![],
            ordering,
            config,
        }
    }

    pub fn n_branches(&self) -> usize {
        self.branches.len()
    }

    /// Explores the whole tree from the current state of `scene`.
    /// The scene is back in that state when this returns successfully.
    pub fn explore(&mut self, scene: &mut Scene) -> Result<()> {
        self.branches = vec![Branch::new(None, None, 0)];
        let mut frontier = vec![0];
        let mut n_visits = 0;

        while let Some(&idx) = frontier.last() {
            if self.branches[idx].visited {
                if let Some(motion) = self.branches[idx].motion {
                    scene.revert(motion.rect)?;
                }
                frontier.pop();
                continue;
            }

            self.branches[idx].visited = true;
            if let Some(motion) = self.branches[idx].motion {
                scene.apply(&motion)?;
            }
            let (w, h) = scene.content_bounds();
            self.branches[idx].value = Some((w * h, n_visits));
            n_visits += 1;

            let depth = self.branches[idx].depth;
            if let Some(&next_rect) = self.ordering.get(depth) {
                let limit = match self.branches.len() < self.config.max_nodes {
                    true => self.config.branching.max(1),
                    false => 1,
                };
                let children = assess::ranked_motions(scene, next_rect, limit)
                    .into_iter()
                    .map(|motion| {
                        self.branches
                            .push(Branch::new(Some(motion), Some(idx), depth + 1));
                        self.branches.len() - 1
                    })
                    .collect_vec();
                // best ranked child on top of the frontier
                frontier.extend(children.iter().rev());
                self.branches[idx].children = children;
            }
        }
        let n_recycled = scene.recycle();
        debug!(
            "[SEARCH] explored {} branches, {n_recycled} outline nodes recycled",
            self.branches.len()
        );
        Ok(())
    }

    /// The leaf placing the most rectangles, then with the smallest content bounding area.
    /// Ties go to the leaf visited first.
    ///
    /// The value compared is the area of [`Scene::content_bounds`] once the leaf's motion is
    /// applied, recorded during [`DecisionTree::explore`]. It is not a sum of the assessments
    /// along the path: growth and fill rate only rank siblings.
    ///
    /// Evaluated bottom-up over the arena: children are always stored after their parent,
    /// so a reverse sweep sees every subtree before its root.
    pub fn best_leaf(&self) -> Option<usize> {
        let rank = |i: usize| {
            let b = &self.branches[i];
            b.value.map(|(area, seq)| (Reverse(b.depth), area, seq))
        };
        let mut best: Vec<Option<usize>> = vec![None; self.branches.len()];
        for idx in (0..self.branches.len()).rev() {
            let branch = &self.branches[idx];
            let leaf = match branch.children.is_empty() {
                true => branch.value.map(|_| idx),
                false => branch
                    .children
                    .iter()
                    .filter_map(|&c| best[c])
                    .min_by_key(|&leaf| rank(leaf)),
            };
            best[idx] = leaf;
        }
        best.first().copied().flatten()
    }

    /// Motions from the root to `leaf`, in application order
    pub fn path(&self, leaf: usize) -> Vec<Motion> {
        let mut motions = vec![];
        let mut cursor = Some(leaf);
        while let Some(idx) = cursor {
            let branch = &self.branches[idx];
            motions.extend(branch.motion);
            cursor = branch.parent;
        }
        motions.reverse();
        motions
    }

    fn value(&self, idx: usize) -> Option<Coord> {
        self.branches[idx].value.map(|(area, _)| area)
    }
}

/// Best placement sequence found by a [`DecisionTree`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub motions: Vec<Motion>,
    /// Content bounding area after applying all motions
    pub area: Coord,
    pub n_branches: usize,
}

impl SearchOutcome {
    /// Applies the motions to `scene`, which must be in the state the search started from.
    pub fn replay(&self, scene: &mut Scene) -> Result<()> {
        for motion in &self.motions {
            scene.apply(motion)?;
        }
        Ok(())
    }
}

/// Searches placement sequences of the current reservoir, in reservoir order.
/// The scene is left untouched, replay the outcome to realize it.
pub fn search(scene: &mut Scene, config: SearchConfig) -> Result<SearchOutcome> {
    let ordering = scene.reservoir().to_vec();
    let n_rects = ordering.len();
    let mut tree = DecisionTree::new(ordering, config);
    tree.explore(scene)?;

    let leaf = tree.best_leaf().context("decision tree has no leaves")?;
    let outcome = SearchOutcome {
        motions: tree.path(leaf),
        area: tree.value(leaf).context("best leaf was never visited")?,
        n_branches: tree.n_branches(),
    };
    info!(
        "[SEARCH] best of {} branches places {}/{} rectangles within a bounding area of {}",
        outcome.n_branches,
        outcome.motions.len(),
        n_rects,
        outcome.area
    );
    Ok(outcome)
}
