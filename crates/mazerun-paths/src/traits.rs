use mazerun_core::Point;

use crate::distance::manhattan;

/// Admissible estimate of the remaining cost between two cells.
pub trait Heuristic {
    /// Heuristic estimate of distance from `from` to `to`.
    /// Must be non-negative and never overestimate the true cost.
    fn estimate(&self, from: Point, to: Point) -> i32;
}

/// The [`manhattan`] distance, the default heuristic for 4-way movement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        manhattan(from, to)
    }
}

impl<F: Fn(Point, Point) -> i32> Heuristic for F {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        self(from, to)
    }
}
