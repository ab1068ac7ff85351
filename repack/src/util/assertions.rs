//! Validators for the outline and the scene.
//! Cheap enough to run after every mutation in debug builds, never needed for correctness.

use crate::entities::{RectId, Scene};
use crate::outline::{NodeKey, Outline};
use itertools::Itertools;
use log::error;
use std::collections::HashSet;

/// Checks every boundary cycle: links are mutual, cycles are closed and disjoint,
/// no retired node is linked and all extents resolve to a node of the same cycle.
/// Extents must also equal those cast from scratch, see [`extents_match_ray_cast`].
pub fn outline_is_consistent(outline: &Outline) -> bool {
    if outline.hangers().primary() != outline.top() {
        error!("primary hanger is not the terminal of the scene");
        return false;
    }
    let mut seen = HashSet::new();
    for hanger in outline.hangers().iter() {
        let cycle = outline.walk(hanger).collect_vec();
        let members = cycle.iter().copied().collect::<HashSet<NodeKey>>();

        if cycle.last().map(|&k| outline.next(k)) != Some(hanger) {
            error!("cycle of hanger {hanger:?} is not closed");
            return false;
        }
        for &key in &cycle {
            let node = outline.node(key);
            if node.retired {
                error!("retired node {key:?} is linked in the cycle of {hanger:?}");
                return false;
            }
            if !seen.insert(key) {
                error!("node {key:?} is linked in more than one cycle");
                return false;
            }
            if outline.prev(node.next) != key {
                error!("link {key:?} -> {:?} is not mutual", node.next);
                return false;
            }
            if !node.extents.iter().all(|e| members.contains(&e)) {
                error!(
                    "extents {:?} of {key:?} escape the cycle of {hanger:?}",
                    node.extents
                );
                return false;
            }
        }
    }
    extents_match_ray_cast(outline)
}

/// The extents kept up to date by every edit are the ones a full ray cast finds
pub fn extents_match_ray_cast(outline: &Outline) -> bool {
    for hanger in outline.hangers().iter() {
        for (key, expected) in outline.ray_cast(hanger) {
            let kept = outline.node(key).extents;
            if kept != expected {
                error!(
                    "extents of {key:?} at {} are {kept:?}, ray cast finds {expected:?}",
                    outline.pos(key)
                );
                return false;
            }
        }
    }
    true
}

/// Every placed rectangle is cut out of the free space: no boundary runs through it
/// and the outline winds around it zero times
pub fn placements_are_enclosed(scene: &Scene) -> bool {
    let outline = scene.outline();
    scene.placed().filter_map(|r| r.footprint()).all(|f| {
        let enclosed = !outline.cuts_through(&f) && outline.winding(f.corners().0) == 0;
        if !enclosed {
            error!("placement {f:?} overlaps the free space");
        }
        enclosed
    })
}

/// No two placed rectangles overlap
pub fn placements_are_disjoint(scene: &Scene) -> bool {
    let footprints = scene.placed().filter_map(|r| r.footprint()).collect_vec();
    footprints
        .iter()
        .tuple_combinations()
        .all(|(a, b)| !a.collides_with(b))
}

/// All placed rectangles lie within the scene bounds
pub fn placements_are_within_bounds(scene: &Scene) -> bool {
    let (x_max, y_max) = scene.bounds();
    scene
        .placed()
        .filter_map(|r| r.footprint())
        .all(|f| f.is_within(x_max, y_max))
}

/// Every rectangle is either in the reservoir or placed at a node that records it, never both
pub fn reservoir_is_consistent(scene: &Scene) -> bool {
    let in_reservoir = scene.reservoir().iter().copied().collect::<HashSet<RectId>>();
    if in_reservoir.len() != scene.reservoir().len() {
        return false;
    }
    scene.rects().iter().all(|r| {
        match (in_reservoir.contains(&r.id), r.owner, r.position) {
            (true, None, None) => true,
            (false, Some(owner), Some(_)) => scene
                .outline()
                .get(owner)
                .is_some_and(|n| n.rect() == Some(r.id)),
            _ => false,
        }
    })
}

pub fn scene_is_consistent(scene: &Scene) -> bool {
    outline_is_consistent(scene.outline())
        && reservoir_is_consistent(scene)
        && placements_are_within_bounds(scene)
        && placements_are_disjoint(scene)
        && placements_are_enclosed(scene)
}
