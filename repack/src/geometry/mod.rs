mod point;
mod rect;

#[doc(inline)]
pub use point::{Coord, Point};

#[doc(inline)]
pub use rect::Rect;
