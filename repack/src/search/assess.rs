use crate::entities::{Assessment, Motion, RectId, Scene};
use crate::geometry::Coord;
use crate::outline::NodeKey;
use rand::Rng;
use rand::seq::IteratorRandom;

/// Every feasible motion of rectangle `id`, over the nodes of every hanger in walk order,
/// unrotated before rotated.
pub fn motions(scene: &Scene, id: RectId) -> Vec<Motion> {
    let outline = scene.outline();
    let rotations: &[bool] = match scene.rect(id).is_square() {
        true => &[false],
        false => &[false, true],
    };
    let content = scene.content_bounds();

    let mut motions = vec![];
    for hanger in outline.hangers().iter() {
        for key in outline.walk(hanger).skip(1) {
            for &rotated in rotations {
                if let Some(motion) = assess(scene, id, key, rotated, content) {
                    motions.push(motion);
                }
            }
        }
    }
    motions
}

/// Builds the motion placing rectangle `id` at `key`, `None` if infeasible.
/// `content` is the current [`Scene::content_bounds`].
pub fn assess(
    scene: &Scene,
    id: RectId,
    key: NodeKey,
    rotated: bool,
    content: (Coord, Coord),
) -> Option<Motion> {
    let (width, height) = scene.rect(id).oriented(rotated);
    if !scene.outline().is_mergeable(key, width, height) {
        return None;
    }
    let frame = scene.outline().frame(key)?;
    let (x_bnd, y_bnd) = content;
    let growth = Coord::max(x_bnd, frame.anchor.x() + width)
        + Coord::max(y_bnd, frame.anchor.y() + height)
        - x_bnd
        - y_bnd;

    Some(Motion {
        rect: id,
        anchor: scene.anchor_of(key)?,
        rotated,
        assessment: Assessment::new(
            growth,
            scene.outline().pos(key).manhattan(),
            frame.fill_rate(width, height),
            frame.anchor,
            rotated,
        ),
    })
}

/// The minimum ranked motion, the first one encountered on ties
pub fn best_motion(scene: &Scene, id: RectId) -> Option<Motion> {
    motions(scene, id)
        .into_iter()
        .min_by_key(|m| m.assessment)
}

/// A feasible motion chosen uniformly at random
pub fn random_motion(scene: &Scene, id: RectId, rng: &mut impl Rng) -> Option<Motion> {
    motions(scene, id).into_iter().choose(rng)
}

/// The `limit` best ranked motions, best first and stable on ties
pub fn ranked_motions(scene: &Scene, id: RectId, limit: usize) -> Vec<Motion> {
    let mut motions = motions(scene, id);
    motions.sort_by_key(|m| m.assessment);
    motions.truncate(limit);
    motions
}
