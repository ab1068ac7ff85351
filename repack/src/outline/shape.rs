use crate::geometry::Point;

/// Local category of an outline node.
/// Derived from the vertical run into the node and the horizontal run out of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Run in goes down (or is flat), run out goes right
    Valley,
    /// Run in goes down (or is flat), run out goes left: the top of a wall overhanging a floor
    Wall,
    /// Run in goes up, run out goes right: the top of a step up from a floor
    Floor,
    /// Run in goes up, run out goes left: closes a boundary cycle
    Terminal,
}

/// Classifies a node at `pos`, given the positions of its boundary neighbours.
pub fn classify(prev: Point, pos: Point, next: Point) -> Shape {
    if pos == prev || pos == next {
        return Shape::Valley;
    }
    let y_in = pos.y() - prev.y();
    let x_out = next.x() - pos.x();
    match (y_in > 0, x_out) {
        (false, x_out) if x_out < 0 => Shape::Wall,
        (false, _) => Shape::Valley,
        (true, x_out) if x_out > 0 => Shape::Floor,
        (true, _) => Shape::Terminal,
    }
}
