use repack::entities::SortKey;
use repack::geometry::Coord;
use repack::util::{BackstepConfig, SearchConfig};
use serde::{Deserialize, Serialize};

/// Configuration of the repack driver
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RepackConfig {
    /// Order in which rectangles leave the reservoir
    pub sort_key: SortKey,
    /// Scene bound as `[x_max, y_max]`. If undefined, a square bound is derived from the rectangles
    pub scene_bound: Option<[Coord; 2]>,
    /// Stretch factor of the derived bound, `ceil(longest side * n * slack)`
    pub bound_slack: f64,
    /// Seed for the PRNG. If undefined, the driver runs in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
    /// Decision tree search replacing the initial greedy pass. Disabled if undefined
    pub search: Option<SearchConfig>,
    /// Instances with more rectangles than this skip the decision tree search
    pub search_limit: usize,
    /// Backstep search run after the initial packing. Disabled if undefined
    pub backstep: Option<BackstepConfig>,
    /// Iterations of the perturbation local search
    pub n_perturbations: usize,
    /// Placements undone per perturbation
    pub perturb_size: usize,
    /// Shrink the scene to the placed rectangles at the end
    pub fit_scene: bool,
}

impl Default for RepackConfig {
    fn default() -> Self {
        Self {
            sort_key: SortKey::Area,
            scene_bound: None,
            bound_slack: 1.01,
            prng_seed: Some(0),
            search: Some(SearchConfig::default()),
            search_limit: 8,
            backstep: Some(BackstepConfig::default()),
            n_perturbations: 200,
            perturb_size: 3,
            fit_scene: true,
        }
    }
}
