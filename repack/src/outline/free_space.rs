use crate::geometry::{Point, Rect};
use crate::outline::Outline;
use itertools::Itertools;

impl Outline {
    /// Every turn of every boundary cycle as a pair of consecutive node positions.
    /// The pair `(a, b)` stands for the horizontal run from `a` to `(b.x, a.y)`
    /// followed by the vertical run up or down to `b`.
    fn turns(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.hangers.iter().flat_map(|h| {
            let cycle = self.walk(h).map(|k| self.pos(k)).collect_vec();
            cycle.into_iter().circular_tuple_windows::<(Point, Point)>()
        })
    }

    /// True if some boundary run passes through the interior of `rect`.
    /// Runs along its edges do not count.
    pub fn cuts_through(&self, rect: &Rect) -> bool {
        self.turns().any(|(a, b)| {
            let (x_lo, x_hi) = (a.x().min(b.x()), a.x().max(b.x()));
            let (y_lo, y_hi) = (a.y().min(b.y()), a.y().max(b.y()));
            let horizontal = rect.y_min < a.y()
                && a.y() < rect.y_max
                && x_lo.max(rect.x_min) < x_hi.min(rect.x_max);
            let vertical = rect.x_min < b.x()
                && b.x() < rect.x_max
                && y_lo.max(rect.y_min) < y_hi.min(rect.y_max);
            horizontal || vertical
        })
    }

    /// Winding number of all boundary cycles around the centre of the unit cell whose
    /// bottom-left corner is `cell`.
    ///
    /// Every cycle runs counter-clockwise around its free region, so the winding is 1 inside
    /// free space and 0 on placed rectangles and outside of the scene.
    pub fn winding(&self, cell: Point) -> i64 {
        self.turns()
            .filter(|(a, b)| {
                b.x() > cell.x() && a.y().min(b.y()) <= cell.y() && cell.y() < a.y().max(b.y())
            })
            .map(|(a, b)| match b.y() > a.y() {
                true => 1,
                false => -1,
            })
            .sum()
    }

    /// True if `rect` lies entirely in free space: no run cuts through it and its
    /// bottom-left cell is enclosed once.
    pub fn is_free(&self, rect: &Rect) -> bool {
        !self.cuts_through(rect) && self.winding(rect.corners().0) == 1
    }
}
