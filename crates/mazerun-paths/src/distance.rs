use mazerun_core::Point;

/// Manhattan (L1) distance between two points.
///
/// Exact for 4-directional unit-cost movement on an empty grid, so it never
/// overestimates the remaining cost.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_values() {
        assert_eq!(manhattan(Point::new(0, 0), Point::new(4, 4)), 8);
        assert_eq!(manhattan(Point::new(2, 5), Point::new(2, 5)), 0);
        assert_eq!(manhattan(Point::new(-1, 3), Point::new(2, 0)), 6);
    }

    #[test]
    fn manhattan_is_symmetric() {
        let pts: Vec<Point> = (-2..3)
            .flat_map(|r| (-2..3).map(move |c| Point::new(r, c * 3)))
            .collect();
        for &a in &pts {
            for &b in &pts {
                assert_eq!(manhattan(a, b), manhattan(b, a), "{a} {b}");
            }
        }
    }
}
