//! Text layouts: grids written as ASCII art.
//!
//! One line per row, one character per cell, using the glyphs of
//! [`CellState::glyph`]:
//!
//! ```text
//! S..#
//! .#.#
//! ...G
//! ```
//!
//! A space also reads as an empty cell. Blank lines before the first row and
//! after the last one are ignored; every row must have the same width.

use std::fmt;

use crate::cell::CellState;
use crate::geom::{Point, Size};
use crate::grid::Grid;

/// Parse a text layout into a [`Grid`].
pub fn parse(s: &str) -> Result<Grid, LayoutError> {
    let s = s.trim_matches(|c| c == '\n' || c == '\r');
    if s.is_empty() {
        return Err(LayoutError::Empty);
    }

    let mut cells = Vec::with_capacity(s.len());
    let mut width: Option<usize> = None;
    let mut rows = 0;

    for (row, line) in s.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut len = 0;
        for (col, ch) in line.chars().enumerate() {
            let state = CellState::from_glyph(ch).ok_or(LayoutError::InvalidRune {
                ch,
                pos: Point::new(row as i32, col as i32),
            })?;
            cells.push(state);
            len += 1;
        }
        match width {
            None => width = Some(len),
            Some(w) if w != len => {
                return Err(LayoutError::InconsistentSize {
                    row,
                    expected: w,
                    actual: len,
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let size = Size::new(rows, width.unwrap_or(0) as i32);
    if size.is_empty() {
        return Err(LayoutError::Empty);
    }
    Grid::from_cells(size, cells).map_err(|_| LayoutError::Empty)
}

/// Render a grid back into its text layout (no trailing newline).
pub fn render(grid: &Grid) -> String {
    let cols = grid.cols().max(0) as usize;
    let mut out = String::with_capacity(grid.size().len() + grid.rows().max(0) as usize);
    for (i, state) in grid.cells().iter().enumerate() {
        if i > 0 && i % cols == 0 {
            out.push('\n');
        }
        out.push(state.glyph());
    }
    out
}

/// Errors that can occur when parsing a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout holds no cell.
    Empty,
    /// Lines have inconsistent widths.
    InconsistentSize {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A character that is not a cell glyph was found.
    InvalidRune { ch: char, pos: Point },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("layout: no cells"),
            Self::InconsistentSize {
                row,
                expected,
                actual,
            } => write!(
                f,
                "layout: line {row} is {actual} cells wide, expected {expected}"
            ),
            Self::InvalidRune { ch, pos } => {
                write!(f, "layout contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
