use crate::entities::RectId;
use crate::geometry::Coord;
use serde::{Deserialize, Serialize};

/// External representation of a packing instance
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtInstance {
    /// The name of the instance
    pub name: String,
    /// Rectangles as `[width, height]`, ids are assigned by position
    pub rectangles: Vec<[Coord; 2]>,
    /// Scene bound as `[x_max, y_max]`, derived from the rectangles if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound: Option<[Coord; 2]>,
}

/// External representation of the placement of a single rectangle
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtPlacement {
    pub id: RectId,
    pub width: Coord,
    pub height: Coord,
    pub rotated: bool,
    /// Bottom-left and top-right corners, `None` if the rectangle was not placed
    pub corners: Option<[[Coord; 2]; 2]>,
}

/// External representation of a solution
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSolution {
    /// Bounding box of the outline, `[width, height]`
    pub bounding: [Coord; 2],
    /// Bounding box of the placed rectangles, `[width, height]`
    pub content: [Coord; 2],
    /// Placed area over the bounding area
    pub occupancy: f64,
    /// Placed area over the content area
    pub density: f64,
    pub placements: Vec<ExtPlacement>,
    pub unplaced: Vec<RectId>,
    /// Seconds since the start of the run
    pub run_time_sec: u64,
}
