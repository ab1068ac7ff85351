use crate::entities::{Scene, SortKey};
use crate::geometry::Coord;
use crate::io::ext_repr::ExtInstance;
use anyhow::{Result, ensure};
use itertools::Itertools;
use log::info;

/// Imports an instance into an empty scene, reservoir ordered by `sort_key`.
/// `bound` is used when the instance does not carry one.
pub fn import(ext: &ExtInstance, bound: (Coord, Coord), sort_key: SortKey) -> Result<Scene> {
    ensure!(
        !ext.rectangles.is_empty(),
        "instance {} contains no rectangles",
        ext.name
    );
    let (x_max, y_max) = ext.bound.map(|[x, y]| (x, y)).unwrap_or(bound);
    let dims = ext.rectangles.iter().map(|&[w, h]| (w, h)).collect_vec();

    let mut scene = Scene::new(x_max, y_max, &dims)?;
    scene.prepare(sort_key);
    info!(
        "[IMPORT] instance {} imported: {} rectangles in a {x_max}x{y_max} scene",
        ext.name,
        dims.len()
    );
    Ok(scene)
}
