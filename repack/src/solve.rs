use crate::entities::{RectId, Rectangle, Scene, SortKey};
use crate::geometry::Coord;
use anyhow::{Result, ensure};
use log::info;

/// Result of a single greedy pass, see [`solve`]
#[derive(Clone, Debug, PartialEq)]
pub struct SolveReport {
    /// All rectangles, with their final position and rotation when placed
    pub rects: Vec<Rectangle>,
    pub occupancy: f64,
    /// Bounding box of the outline
    pub bounding: (Coord, Coord),
    /// Bounding box of the placed rectangles
    pub content: (Coord, Coord),
    pub infeasible: Vec<RectId>,
}

/// Greedily places `dims` once within a `bound` scene, taking rectangles in `sort_key` order.
pub fn solve(
    bound: (Coord, Coord),
    dims: &[(Coord, Coord)],
    sort_key: SortKey,
) -> Result<SolveReport> {
    let mut scene = Scene::new(bound.0, bound.1, dims)?;
    scene.prepare(sort_key);
    let plan = scene.plan()?;

    let report = SolveReport {
        rects: scene.rects().to_vec(),
        occupancy: scene.occupancy_rate(),
        bounding: scene.bounding(),
        content: scene.content_bounds(),
        infeasible: plan.infeasible,
    };
    info!(
        "[SOLVE] placed {}/{} rectangles, occupancy {:.4} of a {}x{} bounding box",
        plan.placed.len(),
        dims.len(),
        report.occupancy,
        report.bounding.0,
        report.bounding.1
    );
    Ok(report)
}

/// Side of a square scene large enough for any greedy packing of `dims`:
/// the longest side times the number of rectangles, stretched by `slack`.
pub fn default_bound(dims: &[(Coord, Coord)], slack: f64) -> Result<Coord> {
    ensure!(slack >= 1.0, "slack must be at least 1, got {slack}");
    let longest = dims.iter().map(|&(w, h)| w.max(h)).max().unwrap_or(0);
    ensure!(longest > 0, "no rectangle with a positive side");
    Ok((longest as f64 * dims.len() as f64 * slack).ceil() as Coord)
}
