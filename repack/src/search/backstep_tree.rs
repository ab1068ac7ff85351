use crate::entities::{RectId, Scene};
use crate::geometry::Coord;
use crate::outline::Detachment;
use crate::util::BackstepConfig;
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{debug, info};
use std::cmp::Reverse;

/// Quality of a state after greedily refilling the reservoir: unplaced rectangles, then content area
type Value = (usize, Coord);

/// One node of the [`BackstepTree`]
#[derive(Clone, Debug)]
struct Step {
    /// Placement undone to reach this step, `None` for the root
    removal: Option<RectId>,
    /// Seam closed by the removal while the step is applied
    detachment: Option<Detachment>,
    parent: Option<usize>,
    depth: usize,
    visited: bool,
    value: Option<(Value, usize)>,
}

/// Tree over sets of undone placements, the mirror image of the
/// [`DecisionTree`](crate::search::DecisionTree).
///
/// Applying a step splits a placement away, reverting it reattaches the placement with the very
/// same outline nodes. Every step is valued by greedily refilling the reservoir and unwinding that
/// refill again, so the tree tells which placements are worth redoing.
#[derive(Clone, Debug)]
pub struct BackstepTree {
    steps: Vec<Step>,
    config: BackstepConfig,
}

impl BackstepTree {
    pub fn new(config: BackstepConfig) -> Self {
        BackstepTree {
            steps: vec![],
            config,
        }
    }

    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }

    /// Explores the tree from the current state of `scene`, leaving it in that state.
    pub fn explore(&mut self, scene: &mut Scene) -> Result<()> {
        self.steps = vec![Step {
            removal: None,
            detachment: None,
            parent: None,
            depth: 0,
            visited: false,
            value: None,
        }];
        let mut frontier = vec![0];
        let mut n_visits = 0;

        while let Some(&idx) = frontier.last() {
            if self.steps[idx].visited {
                if let Some(detachment) = self.steps[idx].detachment.take() {
                    scene.reattach(&detachment)?;
                }
                frontier.pop();
                continue;
            }

            self.steps[idx].visited = true;
            if let Some(id) = self.steps[idx].removal {
                self.steps[idx].detachment = Some(scene.revert(id)?);
            }
            self.steps[idx].value = Some((refill_value(scene)?, n_visits));
            n_visits += 1;

            let depth = self.steps[idx].depth;
            if depth < self.config.depth {
                let children = removal_candidates(scene, self.config.branching)
                    .into_iter()
                    .map(|id| {
                        self.steps.push(Step {
                            removal: Some(id),
                            detachment: None,
                            parent: Some(idx),
                            depth: depth + 1,
                            visited: false,
                            value: None,
                        });
                        self.steps.len() - 1
                    })
                    .collect_vec();
                frontier.extend(children.iter().rev());
            }
        }
        let n_recycled = scene.recycle();
        debug!(
            "[BACKSTEP] explored {} steps, {n_recycled} outline nodes recycled",
            self.steps.len()
        );
        Ok(())
    }

    /// The step with the best value, the first visited on ties
    pub fn best_step(&self) -> Option<usize> {
        (0..self.steps.len())
            .filter_map(|i| self.steps[i].value.map(|v| (v, i)))
            .min_by_key(|&(v, _)| v)
            .map(|(_, i)| i)
    }

    /// Placements undone from the root to `step`, in removal order
    pub fn removals(&self, step: usize) -> Vec<RectId> {
        let mut removals = vec![];
        let mut cursor = Some(step);
        while let Some(idx) = cursor {
            removals.extend(self.steps[idx].removal);
            cursor = self.steps[idx].parent;
        }
        removals.reverse();
        removals
    }

    fn value(&self, step: usize) -> Option<Value> {
        self.steps[step].value.map(|(v, _)| v)
    }
}

/// Greedily places the reservoir, measures the result and splits the refill away again
fn refill_value(scene: &mut Scene) -> Result<Value> {
    let report = scene.plan()?;
    let (w, h) = scene.content_bounds();
    for &id in report.placed.iter().rev() {
        scene.revert(id)?;
    }
    Ok((report.infeasible.len(), w * h))
}

/// Splittable placements, those reaching furthest from the origin first
fn removal_candidates(scene: &Scene, limit: usize) -> Vec<RectId> {
    scene
        .placed()
        .filter(|r| r.owner.is_some_and(|o| scene.outline().is_splittable(o)))
        .filter_map(|r| r.footprint().map(|f| (r.id, f)))
        .sorted_by_key(|&(id, f)| (Reverse(f.x_max + f.y_max), id))
        .take(limit)
        .map(|(id, _)| id)
        .collect()
}

/// Placements worth redoing, as found by a [`BackstepTree`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackstepOutcome {
    pub removals: Vec<RectId>,
    pub unplaced: usize,
    /// Content bounding area after the greedy refill
    pub area: Coord,
    pub n_steps: usize,
}

impl BackstepOutcome {
    /// Undoes the removals on `scene`, which must be in the state the exploration started from,
    /// and greedily refills the reservoir.
    pub fn replay(&self, scene: &mut Scene) -> Result<()> {
        for &id in &self.removals {
            scene.revert(id)?;
        }
        scene.plan()?;
        Ok(())
    }
}

/// Explores undoing up to `config.depth` placements of `scene` followed by a greedy refill.
/// The scene is left untouched, replay the outcome to realize it.
pub fn backstep(scene: &mut Scene, config: BackstepConfig) -> Result<BackstepOutcome> {
    let mut tree = BackstepTree::new(config);
    tree.explore(scene)?;

    let step = tree.best_step().context("backstep tree has no steps")?;
    let (unplaced, area) = tree.value(step).context("best step was never visited")?;
    let outcome = BackstepOutcome {
        removals: tree.removals(step),
        unplaced,
        area,
        n_steps: tree.n_steps(),
    };
    info!(
        "[BACKSTEP] best of {} steps redoes {} placements, {} unplaced within a bounding area of {}",
        outcome.n_steps,
        outcome.removals.len(),
        outcome.unplaced,
        outcome.area
    );
    Ok(outcome)
}
