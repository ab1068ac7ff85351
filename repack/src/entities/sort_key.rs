use crate::entities::{RectId, Rectangle};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Order in which rectangles leave the reservoir.
/// All keys except [`SortKey::Input`] put the largest rectangles first, ties keep input order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Area,
    /// Area, then width
    AreaWidth,
    Perimeter,
    /// Longest side
    LongSide,
    Input,
}

impl SortKey {
    /// Rectangle ids in placement order
    pub fn order(&self, rects: &[Rectangle]) -> Vec<RectId> {
        let ids = rects.iter().map(|r| r.id);
        match self {
            SortKey::Area => ids.sorted_by_key(|&id| Reverse(rects[id].area())).collect(),
            SortKey::AreaWidth => ids
                .sorted_by_key(|&id| Reverse((rects[id].area(), rects[id].width)))
                .collect(),
            SortKey::Perimeter => ids
                .sorted_by_key(|&id| Reverse(rects[id].width + rects[id].height))
                .collect(),
            SortKey::LongSide => ids
                .sorted_by_key(|&id| Reverse(rects[id].width.max(rects[id].height)))
                .collect(),
            SortKey::Input => ids.collect(),
        }
    }
}
