//! The [`Grid`] type: an owned 2D occupancy grid of [`CellState`]s.
//!
//! A `Grid` is a plain value: whoever holds it (an editor, a generator, a
//! search engine borrowing it mutably) is the only party able to change it.

use crate::cell::CellState;
use crate::error::GridError;
use crate::geom::{Point, Size, SizeIter};

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A `rows × cols` grid of cell states stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<CellState>,
    size: Size,
}

impl Grid {
    /// Create a grid with every cell [`CellState::Empty`].
    pub fn new(rows: i32, cols: i32) -> Result<Self, GridError> {
        let size = Size::new(rows, cols);
        if size.is_empty() {
            return Err(GridError::EmptyDimensions(size));
        }
        Ok(Self {
            cells: vec![CellState::Empty; size.len()],
            size,
        })
    }

    /// Create a grid from row-major occupancy data.
    ///
    /// Fails if `cells.len()` differs from `size.len()`.
    pub fn from_cells(size: Size, cells: Vec<CellState>) -> Result<Self, GridError> {
        if size.is_empty() {
            return Err(GridError::EmptyDimensions(size));
        }
        if cells.len() != size.len() {
            return Err(GridError::DimensionMismatch {
                size,
                actual: cells.len(),
            });
        }
        Ok(Self { cells, size })
    }

    /// Create a grid from a list of equally long rows.
    pub fn from_rows<R: AsRef<[CellState]>>(rows: &[R]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let size = Size::new(rows.len() as i32, width as i32);
        if size.is_empty() {
            return Err(GridError::EmptyDimensions(size));
        }
        let mut cells = Vec::with_capacity(size.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: i,
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { cells, size })
    }

    /// Grid dimensions.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.size.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.size.cols
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn is_within_bounds(&self, p: Point) -> bool {
        self.size.contains(p)
    }

    /// Whether a path may enter `p`: false when out of bounds or a wall.
    #[inline]
    pub fn is_traversable(&self, p: Point) -> bool {
        self.get_state(p).is_some_and(CellState::is_traversable)
    }

    /// State at `p`, or `None` when out of bounds.
    #[inline]
    pub fn get_state(&self, p: Point) -> Option<CellState> {
        self.size.index(p).map(|i| self.cells[i])
    }

    /// Overwrite the state at `p`.
    ///
    /// Out-of-bounds writes are rejected with [`GridError::InvalidCoordinate`]
    /// and leave the grid untouched.
    pub fn set_state(&mut self, p: Point, state: CellState) -> Result<(), GridError> {
        let i = self.size.index(p).ok_or(GridError::InvalidCoordinate {
            pos: p,
            size: self.size,
        })?;
        self.cells[i] = state;
        Ok(())
    }

    /// Set every cell to `state`.
    pub fn fill(&mut self, state: CellState) {
        self.cells.fill(state);
    }

    /// First cell holding `state`, in row-major order.
    pub fn find(&self, state: CellState) -> Option<Point> {
        self.cells
            .iter()
            .position(|&s| s == state)
            .map(|i| self.size.point(i))
    }

    /// Number of cells holding `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    /// Turn every `Visited` / `Path` cell back into `Empty`.
    ///
    /// Walls, start and goal are kept, so the same layout can be searched
    /// again.
    pub fn clear_search(&mut self) {
        for s in self.cells.iter_mut() {
            if s.is_search_mark() {
                *s = CellState::Empty;
            }
        }
    }

    /// Row-major view of the raw states.
    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Owned copy of the states, row-major.
    pub fn snapshot(&self) -> Vec<CellState> {
        self.cells.clone()
    }

    /// Row-major iterator over `(Point, CellState)` pairs.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            grid: self,
            inner: self.size.iter(),
        }
    }
}

// ---------------------------------------------------------------------------
// GridIter
// ---------------------------------------------------------------------------

/// Iterator over `(Point, CellState)` pairs in a [`Grid`].
pub struct GridIter<'a> {
    grid: &'a Grid,
    inner: SizeIter,
}

impl Iterator for GridIter<'_> {
    type Item = (Point, CellState);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let p = self.inner.next()?;
        let i = self.grid.size.index(p)?;
        Some((p, self.grid.cells[i]))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between two grid states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub pos: Point,
    pub state: CellState,
}

/// A set of cell changes (a diff frame), tagged with the search iteration
/// that produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub iteration: u64,
    pub size: Size,
    pub cells: Vec<FrameCell>,
}

impl Frame {
    /// A frame listing every cell of `grid`, used as a replay keyframe.
    pub fn full(grid: &Grid, iteration: u64) -> Self {
        Self {
            iteration,
            size: grid.size(),
            cells: grid
                .iter()
                .map(|(pos, state)| FrameCell { pos, state })
                .collect(),
        }
    }

    /// Apply the frame's changes to `grid`, skipping cells out of bounds.
    pub fn apply(&self, grid: &mut Grid) {
        for fc in &self.cells {
            // Frames recorded on a larger grid simply lose their outer cells.
            let _ = grid.set_state(fc.pos, fc.state);
        }
    }
}

/// Compute the difference between two same-sized grids.
///
/// Returns a [`Frame`] containing only the cells of `curr` that differ from
/// `prev`. Cells outside `prev` count as changed.
pub fn compute_frame(prev: &Grid, curr: &Grid, iteration: u64) -> Frame {
    let cells = curr
        .iter()
        .filter(|&(p, s)| prev.get_state(p) != Some(s))
        .map(|(pos, state)| FrameCell { pos, state })
        .collect();
    Frame {
        iteration,
        size: curr.size(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cell::CellState::{Empty as E, Goal as G, Start as S, Wall as W};

    #[test]
    fn grid_new_and_get() {
        let g = Grid::new(3, 4).unwrap();
        assert_eq!(g.size(), Size::new(3, 4));
        assert_eq!(g.get_state(Point::new(0, 0)), Some(CellState::Empty));
        assert_eq!(g.get_state(Point::new(3, 0)), None);
    }

    #[test]
    fn grid_new_rejects_empty_dimensions() {
        assert_eq!(
            Grid::new(0, 5),
            Err(GridError::EmptyDimensions(Size::new(0, 5)))
        );
    }

    #[test]
    fn set_state_out_of_bounds_is_rejected() {
        let mut g = Grid::new(2, 2).unwrap();
        let before = g.clone();
        let err = g.set_state(Point::new(2, 0), CellState::Wall).unwrap_err();
        assert!(matches!(err, GridError::InvalidCoordinate { .. }));
        assert_eq!(g, before);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut g = Grid::from_rows(&[[S, E, G]]).unwrap();
        let snap = g.snapshot();
        g.set_state(Point::new(0, 1), CellState::Visited).unwrap();
        assert_eq!(snap, vec![S, E, G]);
        assert_eq!(g.cells()[1], CellState::Visited);
    }

    #[test]
    fn traversable_excludes_walls_and_outside() {
        let g = Grid::from_rows(&[[E, W], [S, G]]).unwrap();
        assert!(g.is_traversable(Point::new(0, 0)));
        assert!(!g.is_traversable(Point::new(0, 1)));
        assert!(g.is_traversable(Point::new(1, 0)));
        assert!(g.is_traversable(Point::new(1, 1)));
        assert!(!g.is_traversable(Point::new(-1, 0)));
        assert!(!g.is_traversable(Point::new(0, 2)));
    }

    #[test]
    fn from_cells_checks_length() {
        let err = Grid::from_cells(Size::new(2, 2), vec![E; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::DimensionMismatch {
                size: Size::new(2, 2),
                actual: 3
            }
        );
    }

    #[test]
    fn from_rows_checks_shape() {
        let rows: Vec<Vec<CellState>> = vec![vec![E, E], vec![E]];
        let err = Grid::from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn find_and_count() {
        let g = Grid::from_rows(&[[S, W, W], [E, E, G]]).unwrap();
        assert_eq!(g.find(CellState::Start), Some(Point::new(0, 0)));
        assert_eq!(g.find(CellState::Goal), Some(Point::new(1, 2)));
        assert_eq!(g.find(CellState::Path), None);
        assert_eq!(g.count(CellState::Wall), 2);
    }

    #[test]
    fn clear_search_keeps_layout() {
        let mut g = Grid::from_rows(&[[S, W, E], [E, E, G]]).unwrap();
        g.set_state(Point::new(0, 2), CellState::Visited).unwrap();
        g.set_state(Point::new(1, 1), CellState::Path).unwrap();
        g.clear_search();
        assert_eq!(g, Grid::from_rows(&[[S, W, E], [E, E, G]]).unwrap());
    }

    #[test]
    fn compute_frame_diff() {
        let a = Grid::new(2, 3).unwrap();
        let mut b = a.clone();
        b.set_state(Point::new(1, 0), CellState::Visited).unwrap();
        let frame = compute_frame(&a, &b, 7);
        assert_eq!(frame.iteration, 7);
        assert_eq!(
            frame.cells,
            vec![FrameCell {
                pos: Point::new(1, 0),
                state: CellState::Visited
            }]
        );

        let mut replay = a.clone();
        frame.apply(&mut replay);
        assert_eq!(replay, b);
    }

    #[test]
    fn full_frame_lists_every_cell() {
        let g = Grid::from_rows(&[[S, G]]).unwrap();
        let frame = Frame::full(&g, 0);
        assert_eq!(frame.cells.len(), 2);
        let mut blank = Grid::new(1, 2).unwrap();
        frame.apply(&mut blank);
        assert_eq!(blank, g);
    }
}
