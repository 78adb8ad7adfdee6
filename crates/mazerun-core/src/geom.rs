//! Geometry primitives: [`Point`] and [`Size`].
//!
//! Coordinates are `(row, col)` pairs. Rows grow downwards, columns grow to
//! the right, and every ordering in this crate is row-major.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A grid coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// The four axis-aligned unit offsets, in expansion order.
    pub const CARDINALS: [Point; 4] = [
        Point::new(0, 1),
        Point::new(0, -1),
        Point::new(1, 0),
        Point::new(-1, 0),
    ];

    /// Create a new point.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return a point shifted by (drow, dcol).
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// The four axis-aligned neighbours, in the order of [`Point::CARDINALS`].
    ///
    /// Neighbours may lie outside any grid; callers filter them.
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        Self::CARDINALS.map(|d| self + d)
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// Grid dimensions: `rows × cols`, covering points `[0, rows) × [0, cols)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells. Zero when either side is non-positive.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.rows as usize) * (self.cols as usize)
    }

    /// Whether the size covers no cell at all.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.rows <= 0 || self.cols <= 0
    }

    /// Whether `p` lies inside `[0, rows) × [0, cols)`.
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        p.row >= 0 && p.row < self.rows && p.col >= 0 && p.col < self.cols
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index(self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.row as usize * self.cols as usize + p.col as usize)
    }

    /// Inverse of [`index`](Size::index).
    #[inline]
    pub fn point(self, idx: usize) -> Point {
        let cols = self.cols.max(1) as usize;
        Point::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// Row-major iterator over every point.
    #[inline]
    pub fn iter(self) -> SizeIter {
        SizeIter {
            size: self,
            cur: Point::ZERO,
        }
    }
}

impl IntoIterator for Size {
    type Item = Point;
    type IntoIter = SizeIter;
    #[inline]
    fn into_iter(self) -> SizeIter {
        self.iter()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

// ---------------------------------------------------------------------------
// SizeIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the points covered by a [`Size`].
#[derive(Clone, Debug)]
pub struct SizeIter {
    size: Size,
    cur: Point,
}

impl Iterator for SizeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.size.is_empty() || self.cur.row >= self.size.rows {
            return None;
        }
        let p = self.cur;
        self.cur.col += 1;
        if self.cur.col >= self.size.cols {
            self.cur.col = 0;
            self.cur.row += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.size.is_empty() || self.cur.row >= self.size.rows {
            return (0, Some(0));
        }
        let remaining_in_row = (self.size.cols - self.cur.col) as usize;
        let remaining_rows = (self.size.rows - self.cur.row - 1) as usize;
        let total = remaining_in_row + remaining_rows * self.size.cols as usize;
        (total, Some(total))
    }
}

impl ExactSizeIterator for SizeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(a.shift(-1, 1), Point::new(0, 3));
    }

    #[test]
    fn neighbors_follow_expansion_order() {
        let p = Point::new(2, 2);
        assert_eq!(
            p.neighbors_4(),
            [
                Point::new(2, 3),
                Point::new(2, 1),
                Point::new(3, 2),
                Point::new(1, 2),
            ]
        );
    }

    #[test]
    fn point_order_is_row_major() {
        assert!(Point::new(0, 5) < Point::new(1, 0));
        assert!(Point::new(1, 0) < Point::new(1, 1));
    }

    #[test]
    fn size_contains_and_len() {
        let s = Size::new(2, 3);
        assert_eq!(s.len(), 6);
        assert!(s.contains(Point::new(1, 2)));
        assert!(!s.contains(Point::new(2, 0)));
        assert!(!s.contains(Point::new(0, 3)));
        assert!(!s.contains(Point::new(-1, 0)));
    }

    #[test]
    fn size_index_round_trip() {
        let s = Size::new(3, 4);
        for p in s {
            let i = s.index(p).unwrap();
            assert_eq!(s.point(i), p);
        }
        assert_eq!(s.index(Point::new(3, 0)), None);
    }

    #[test]
    fn size_iter_is_row_major() {
        let pts: Vec<_> = Size::new(2, 3).iter().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], Point::new(0, 0));
        assert_eq!(pts[2], Point::new(0, 2));
        assert_eq!(pts[3], Point::new(1, 0));
        assert_eq!(Size::new(2, 3).iter().len(), 6);
    }

    #[test]
    fn empty_size_iter() {
        let s = Size::new(0, 4);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.iter().count(), 0);
    }
}
