//! Packing of axis-aligned, rotatable rectangles on an incremental outline.
//!
//! The outline traces the silhouette of everything placed so far as one or more boundary cycles of
//! turning nodes. Placing a rectangle merges it into the outline at a node, removing it splits the
//! node back. Search strategies enumerate feasible merges, commit the best one and, when
//! backtracking, split them again.

/// Scene, rectangles and the candidate placements between them
pub mod entities;

/// Integer geometric primitives
pub mod geometry;

/// Importing rectangle lists into and exporting packings out of this library
pub mod io;

/// The outline arena: nodes, shape classification, frames and the merge/split mutators
pub mod outline;

/// Placement assessment, the backtracking decision tree and the backstep tree
pub mod search;

/// Helper functions which do not belong to any specific module
pub mod util;

mod solve;

#[doc(inline)]
pub use solve::{SolveReport, default_bound, solve};
