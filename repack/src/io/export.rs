use crate::entities::Scene;
use crate::io::ext_repr::{ExtPlacement, ExtSolution};
use std::time::Instant;

/// Exports the state of a scene out of the library
pub fn export(scene: &Scene, epoch: Instant) -> ExtSolution {
    let (bw, bh) = scene.bounding();
    let (cw, ch) = scene.content_bounds();
    let placements = scene
        .rects()
        .iter()
        .map(|r| {
            let (width, height) = r.dims();
            ExtPlacement {
                id: r.id,
                width,
                height,
                rotated: r.rotated,
                corners: r.footprint().map(|f| {
                    let (bl, tr) = f.corners();
                    [[bl.x(), bl.y()], [tr.x(), tr.y()]]
                }),
            }
        })
        .collect();

    ExtSolution {
        bounding: [bw, bh],
        content: [cw, ch],
        occupancy: scene.occupancy_rate(),
        density: scene.density(),
        placements,
        unplaced: scene.reservoir().to_vec(),
        run_time_sec: epoch.elapsed().as_secs(),
    }
}
