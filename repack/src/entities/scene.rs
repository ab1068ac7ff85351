use crate::entities::{Anchor, ChildSlot, Motion, RectId, Rectangle, SortKey};
use crate::geometry::{Coord, Point};
use crate::outline::{Detachment, NodeKey, Outline};
use crate::search::assess;
use crate::util::assertions;
use anyhow::{Context, Result, bail, ensure};
use itertools::Itertools;
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::IteratorRandom;

/// Outcome of trying to place one rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Placed(Motion),
    /// No node of any hanger can take the rectangle in either orientation
    Infeasible(RectId),
}

/// Summary of a planning pass over the reservoir
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanReport {
    /// Rectangles placed by the pass, in placement order
    pub placed: Vec<RectId>,
    /// Rectangles left in the reservoir because no placement was feasible
    pub infeasible: Vec<RectId>,
}

/// A packing in progress: the outline, all rectangles and the reservoir of those not placed.
#[derive(Clone, Debug)]
pub struct Scene {
    outline: Outline,
    rects: Vec<Rectangle>,
    /// Position of every rectangle in the placement order
    rank: Vec<usize>,
    /// Unplaced rectangles, sorted by rank
    reservoir: Vec<RectId>,
}

impl Scene {
    /// Creates an empty `x_max` x `y_max` scene holding a rectangle per `(width, height)` pair.
    /// Ids are assigned by position, the reservoir follows input order until [`Scene::prepare`].
    pub fn new(x_max: Coord, y_max: Coord, dims: &[(Coord, Coord)]) -> Result<Self> {
        let outline = Outline::new(x_max, y_max)?;
        let rects = dims
            .iter()
            .enumerate()
            .map(|(id, &(w, h))| Rectangle::try_new(id, w, h))
            .collect::<Result<Vec<_>>>()?;
        let rank = (0..rects.len()).collect_vec();
        let reservoir = (0..rects.len()).collect_vec();

        Ok(Scene {
            outline,
            rects,
            rank,
            reservoir,
        })
    }

    /// Reorders the reservoir, and any rectangle returning to it later, by `sort_key`.
    pub fn prepare(&mut self, sort_key: SortKey) {
        for (rank, id) in sort_key.order(&self.rects).into_iter().enumerate() {
            self.rank[id] = rank;
        }
        let rank = &self.rank;
        self.reservoir.sort_by_key(|&id| rank[id]);
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn rects(&self) -> &[Rectangle] {
        &self.rects
    }

    pub fn rect(&self, id: RectId) -> &Rectangle {
        &self.rects[id]
    }

    pub fn reservoir(&self) -> &[RectId] {
        &self.reservoir
    }

    pub fn placed(&self) -> impl Iterator<Item = &Rectangle> {
        self.rects.iter().filter(|r| r.is_placed())
    }

    pub fn n_placed(&self) -> usize {
        self.rects.len() - self.reservoir.len()
    }

    pub fn bounds(&self) -> (Coord, Coord) {
        self.outline.bounds()
    }

    /// Resolves a structural anchor to the node it currently designates
    pub fn resolve(&self, anchor: Anchor) -> Option<NodeKey> {
        let node = match anchor.parent {
            None => match anchor.slot {
                ChildSlot::Top => self.outline.top(),
                ChildSlot::Bottom => self.outline.origin(),
            },
            Some(parent) => {
                let owner = self.rects.get(parent)?.owner?;
                let junction = self.outline.node(owner).junction?;
                match anchor.slot {
                    ChildSlot::Top => junction.top,
                    ChildSlot::Bottom => junction.bottom,
                }
            }
        };
        Some(node)
    }

    /// Structural anchor of a node, the inverse of [`Scene::resolve`]
    pub fn anchor_of(&self, key: NodeKey) -> Option<Anchor> {
        match self.outline.get(key)?.parent {
            None => Some(match key == self.outline.origin() {
                true => Anchor::ORIGIN,
                false => Anchor::TERMINAL,
            }),
            Some(parent) => {
                let junction = self.outline.get(parent)?.junction?;
                let slot = match key == junction.top {
                    true => ChildSlot::Top,
                    false => ChildSlot::Bottom,
                };
                Some(Anchor {
                    parent: Some(junction.rect),
                    slot,
                })
            }
        }
    }

    /// Commits a motion. Returns the node the rectangle was merged at.
    pub fn apply(&mut self, motion: &Motion) -> Result<NodeKey> {
        let key = self.resolve(motion.anchor).with_context(|| {
            format!("anchor {:?} does not resolve to a node", motion.anchor)
        })?;
        let rect = self
            .rects
            .get(motion.rect)
            .with_context(|| format!("unknown rectangle {}", motion.rect))?;
        ensure!(!rect.is_placed(), "rectangle {} is already placed", rect.id);

        let (width, height) = rect.oriented(motion.rotated);
        let merged = self
            .outline
            .merge(key, width, height, motion.rect)
            .with_context(|| format!("rectangle {} cannot be placed", rect.id))?;

        let rect = &mut self.rects[motion.rect];
        rect.rotated = motion.rotated;
        rect.position = Some(merged.anchor);
        rect.owner = Some(key);
        self.reservoir.retain(|&id| id != motion.rect);

        debug!(
            "[SCENE] placed rectangle {} ({width}x{height}) at {}",
            motion.rect, merged.anchor
        );
        debug_assert!(assertions::scene_is_consistent(self));
        Ok(key)
    }

    /// Removes a placed rectangle by splitting the node it was merged at.
    /// The rectangle returns to the reservoir.
    pub fn revert(&mut self, id: RectId) -> Result<Detachment> {
        let owner = self
            .rects
            .get(id)
            .and_then(|r| r.owner)
            .with_context(|| format!("rectangle {id} is not placed"))?;
        let detachment = self.outline.split(owner)?;
        self.release(id);

        debug_assert!(assertions::scene_is_consistent(self));
        Ok(detachment)
    }

    /// Puts a rectangle back exactly where a [`Scene::revert`] took it from.
    pub fn reattach(&mut self, detachment: &Detachment) -> Result<()> {
        let id = detachment.junction.rect;
        ensure!(
            !self.rects[id].is_placed(),
            "rectangle {id} is already placed"
        );
        self.outline.reattach(detachment)?;

        let anchor = Point(
            self.outline.pos(detachment.junction.top).x(),
            self.outline.pos(detachment.junction.bottom).y(),
        );
        let rect = &mut self.rects[id];
        rect.position = Some(anchor);
        rect.owner = Some(detachment.parent);
        self.reservoir.retain(|&r| r != id);

        debug_assert!(assertions::scene_is_consistent(self));
        Ok(())
    }

    /// Removes a placed rectangle together with everything stacked on it.
    /// Returns the removed rectangles, deepest first.
    pub fn cascade(&mut self, id: RectId) -> Result<Vec<RectId>> {
        let owner = self
            .rects
            .get(id)
            .and_then(|r| r.owner)
            .with_context(|| format!("rectangle {id} is not placed"))?;
        let removed = self
            .outline
            .cascade_split(owner)?
            .into_iter()
            .map(|d| d.junction.rect)
            .collect_vec();
        for &r in &removed {
            self.release(r);
        }

        debug!(
            "[SCENE] cascaded removal of rectangle {id} released {} rectangles",
            removed.len()
        );
        debug_assert!(assertions::scene_is_consistent(self));
        Ok(removed)
    }

    /// Places a rectangle at the best ranked feasible motion
    pub fn place_greedy(&mut self, id: RectId) -> Result<Placement> {
        match assess::best_motion(self, id) {
            Some(motion) => {
                self.apply(&motion)?;
                Ok(Placement::Placed(motion))
            }
            None => {
                warn!("[SCENE] no feasible placement for rectangle {id}");
                Ok(Placement::Infeasible(id))
            }
        }
    }

    /// Places a rectangle at a feasible motion chosen uniformly at random
    pub fn place_random(&mut self, id: RectId, rng: &mut impl Rng) -> Result<Placement> {
        match assess::random_motion(self, id, rng) {
            Some(motion) => {
                self.apply(&motion)?;
                Ok(Placement::Placed(motion))
            }
            None => {
                warn!("[SCENE] no feasible placement for rectangle {id}");
                Ok(Placement::Infeasible(id))
            }
        }
    }

    /// Places every rectangle of the reservoir greedily, in reservoir order.
    pub fn plan(&mut self) -> Result<PlanReport> {
        self.plan_with(|scene, id| scene.place_greedy(id))
    }

    /// Places every rectangle of the reservoir at a random feasible motion, in reservoir order.
    pub fn plan_random(&mut self, rng: &mut impl Rng) -> Result<PlanReport> {
        self.plan_with(|scene, id| scene.place_random(id, rng))
    }

    fn plan_with(
        &mut self,
        mut place: impl FnMut(&mut Scene, RectId) -> Result<Placement>,
    ) -> Result<PlanReport> {
        let mut report = PlanReport::default();
        for id in self.reservoir.clone() {
            match place(self, id)? {
                Placement::Placed(_) => report.placed.push(id),
                Placement::Infeasible(id) => report.infeasible.push(id),
            }
        }
        debug!(
            "[SCENE] planned {} rectangles, {} infeasible",
            report.placed.len(),
            report.infeasible.len()
        );
        Ok(report)
    }

    /// Removes up to `count` placements chosen uniformly among the splittable ones.
    /// Returns the removed rectangles.
    pub fn perturb(&mut self, rng: &mut impl Rng, count: usize) -> Result<Vec<RectId>> {
        let mut removed = vec![];
        for _ in 0..count {
            let candidate = self
                .placed()
                .filter(|r| r.owner.is_some_and(|o| self.outline.is_splittable(o)))
                .map(|r| r.id)
                .choose(rng);
            let Some(id) = candidate else {
                break;
            };
            self.revert(id)?;
            removed.push(id);
        }
        Ok(removed)
    }

    /// Shrinks the scene to the bounding box of the placed rectangles.
    pub fn fit(&mut self) -> Result<()> {
        let (x_max, y_max) = self.content_bounds();
        if x_max == 0 || y_max == 0 {
            bail!("cannot fit a scene without placed rectangles");
        }
        self.outline.refit(x_max, y_max)?;
        info!("[SCENE] fitted scene to {x_max}x{y_max}");
        Ok(())
    }

    /// Drops the outline nodes retired by splits. Invalidates outstanding [`Detachment`]s.
    pub fn recycle(&mut self) -> usize {
        self.outline.recycle()
    }

    pub fn save(&self) -> SceneSnapshot {
        SceneSnapshot {
            outline: self.outline.clone(),
            rects: self.rects.clone(),
            rank: self.rank.clone(),
            reservoir: self.reservoir.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.outline = snapshot.outline.clone();
        self.rects.clone_from(&snapshot.rects);
        self.rank.clone_from(&snapshot.rank);
        self.reservoir.clone_from(&snapshot.reservoir);
        debug_assert!(assertions::scene_is_consistent(self));
    }

    pub fn placed_area(&self) -> Coord {
        self.placed().map(|r| r.area()).sum()
    }

    /// Top-right corner of the bounding box of all placed rectangles
    pub fn content_bounds(&self) -> (Coord, Coord) {
        self.placed()
            .filter_map(|r| r.footprint())
            .fold((0, 0), |(x, y), f| (x.max(f.x_max), y.max(f.y_max)))
    }

    /// Bounding box of the primary outline, its terminal included
    pub fn bounding(&self) -> (Coord, Coord) {
        self.outline.envelope()
    }

    /// Placed area divided by the area of [`Scene::bounding`]
    pub fn occupancy_rate(&self) -> f64 {
        let (w, h) = self.bounding();
        match w * h {
            0 => 0.0,
            area => self.placed_area() as f64 / area as f64,
        }
    }

    /// Placed area divided by the area of [`Scene::content_bounds`]
    pub fn density(&self) -> f64 {
        let (w, h) = self.content_bounds();
        match w * h {
            0 => 0.0,
            area => self.placed_area() as f64 / area as f64,
        }
    }

    /// Runs every validator, reporting the first violation found
    pub fn validate(&self) -> Result<()> {
        ensure!(
            assertions::outline_is_consistent(&self.outline),
            "outline is inconsistent"
        );
        ensure!(
            assertions::reservoir_is_consistent(self),
            "reservoir and placements disagree"
        );
        ensure!(
            assertions::placements_are_within_bounds(self),
            "a placement exceeds the scene bounds"
        );
        ensure!(
            assertions::placements_are_disjoint(self),
            "placements overlap"
        );
        ensure!(
            assertions::placements_are_enclosed(self),
            "a placement is not cut out of the free space"
        );
        Ok(())
    }

    fn release(&mut self, id: RectId) {
        let rect = &mut self.rects[id];
        rect.last_owner = rect.owner.take();
        rect.position = None;

        let rank = &self.rank;
        let idx = self.reservoir.partition_point(|&r| rank[r] < rank[id]);
        self.reservoir.insert(idx, id);
    }
}

/// Copy of the full state of a [`Scene`], see [`Scene::save`] and [`Scene::restore`]
#[derive(Clone, Debug)]
pub struct SceneSnapshot {
    outline: Outline,
    rects: Vec<Rectangle>,
    rank: Vec<usize>,
    reservoir: Vec<RectId>,
}
