use std::ops::RangeInclusive;

use anyhow::{Result, ensure};
use rand::Rng;
use repack::geometry::Coord;
use repack::io::ext_repr::ExtInstance;

/// Generates an instance of `n` rectangles with sides drawn uniformly from `w_range` and `h_range`.
pub fn generate_instance(
    n: usize,
    w_range: RangeInclusive<Coord>,
    h_range: RangeInclusive<Coord>,
    rng: &mut impl Rng,
) -> Result<ExtInstance> {
    ensure!(n > 0, "cannot generate an instance without rectangles");
    for range in [&w_range, &h_range] {
        ensure!(
            !range.is_empty() && *range.start() > 0,
            "side range {range:?} must be non-empty and positive"
        );
    }

    let rectangles = (0..n)
        .map(|_| {
            [
                rng.random_range(w_range.clone()),
                rng.random_range(h_range.clone()),
            ]
        })
        .collect();

    Ok(ExtInstance {
        name: format!("random_{n}"),
        rectangles,
        bound: None,
    })
}
