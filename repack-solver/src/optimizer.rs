use anyhow::Result;
use log::{debug, info};
use rand::Rng;
use rand::prelude::SmallRng;
use repack::entities::Scene;
use repack::geometry::Coord;
use repack::search::{backstep, search};
use thousands::Separable;

use crate::config::RepackConfig;

/// Unplaced rectangles, then content bounding area. Smaller is better.
pub fn loss(scene: &Scene) -> (usize, Coord) {
    let (w, h) = scene.content_bounds();
    (scene.reservoir().len(), w * h)
}

/// Drives a [`Scene`] from an empty outline to a fitted packing
pub struct RepackOptimizer {
    pub scene: Scene,
    pub config: RepackConfig,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    pub rng: SmallRng,
}

impl RepackOptimizer {
    pub fn new(scene: Scene, config: RepackConfig, rng: SmallRng) -> Self {
        Self { scene, config, rng }
    }

    pub fn solve(&mut self) -> Result<()> {
        let n_rects = self.scene.rects().len();

        self.initial_packing()?;
        info!(
            "[OPT] initial packing placed {}/{} rectangles, loss {:?}",
            self.scene.n_placed(),
            n_rects,
            loss(&self.scene)
        );

        if let Some(backstep_config) = self.config.backstep {
            let before = loss(&self.scene);
            let outcome = backstep(&mut self.scene, backstep_config)?;
            if (outcome.unplaced, outcome.area) < before {
                let snapshot = self.scene.save();
                outcome.replay(&mut self.scene)?;
                match loss(&self.scene) < before {
                    true => {
                        self.scene.recycle();
                        info!(
                            "[OPT] backstep redid {:?}, loss {:?}",
                            outcome.removals,
                            loss(&self.scene)
                        );
                    }
                    false => self.scene.restore(&snapshot),
                }
            }
        }

        self.local_search()?;

        if self.config.fit_scene && self.scene.n_placed() > 0 {
            self.scene.fit()?;
        }
        let (w, h) = self.scene.bounding();
        info!(
            "[OPT] finished: {}/{} rectangles placed, {} of {} area units, occupancy {:.3}, density {:.3}",
            self.scene.n_placed(),
            n_rects,
            self.scene.placed_area().separate_with_commas(),
            (w * h).separate_with_commas(),
            self.scene.occupancy_rate(),
            self.scene.density()
        );
        Ok(())
    }

    /// Decision tree search on small reservoirs, a greedy pass otherwise.
    /// Anything the best leaf left out is greedily placed afterwards.
    fn initial_packing(&mut self) -> Result<()> {
        match self.config.search {
            Some(search_config) if self.scene.reservoir().len() <= self.config.search_limit => {
                let outcome = search(&mut self.scene, search_config)?;
                outcome.replay(&mut self.scene)?;
                self.scene.plan()?;
            }
            _ => {
                self.scene.plan()?;
            }
        }
        Ok(())
    }

    /// Repeatedly undoes a few placements and refills the reservoir, either greedily or at random.
    /// Non-worsening moves are kept, all others are rolled back.
    fn local_search(&mut self) -> Result<()> {
        let mut best = loss(&self.scene);
        let (mut n_accepted, mut n_improved) = (0, 0);

        for i in 0..self.config.n_perturbations {
            let snapshot = self.scene.save();
            let removed = self.scene.perturb(&mut self.rng, self.config.perturb_size)?;
            if removed.is_empty() {
                break;
            }
            match self.rng.random_bool(0.5) {
                true => self.scene.plan()?,
                false => self.scene.plan_random(&mut self.rng)?,
            };

            let current = loss(&self.scene);
            if current <= best {
                if current < best {
                    n_improved += 1;
                    debug!("[OPT] perturbation {i} improved loss to {current:?}");
                }
                best = current;
                n_accepted += 1;
                self.scene.recycle();
            } else {
                self.scene.restore(&snapshot);
            }
        }
        info!(
            "[OPT] local search: {} perturbations, {} accepted, {} improving, loss {:?}",
            self.config.n_perturbations.separate_with_commas(),
            n_accepted.separate_with_commas(),
            n_improved,
            best
        );
        Ok(())
    }
}
