//! Errors raised by the grid model.

use std::fmt;

use crate::geom::{Point, Size};

/// Errors that can occur when building or mutating a [`Grid`](crate::Grid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A coordinate outside the grid bounds.
    InvalidCoordinate { pos: Point, size: Size },
    /// The occupancy data does not match the declared dimensions.
    DimensionMismatch { size: Size, actual: usize },
    /// A row of the occupancy data has the wrong width.
    RaggedRow { row: usize, expected: usize, actual: usize },
    /// Rows or columns are not positive.
    EmptyDimensions(Size),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate { pos, size } => {
                write!(f, "grid: coordinate {pos} outside {size} grid")
            }
            Self::DimensionMismatch { size, actual } => write!(
                f,
                "grid: {size} grid needs {} cells, got {actual}",
                size.len()
            ),
            Self::RaggedRow {
                row,
                expected,
                actual,
            } => write!(
                f,
                "grid: row {row} has {actual} cells, expected {expected}"
            ),
            Self::EmptyDimensions(size) => {
                write!(f, "grid: dimensions must be positive, got {size}")
            }
        }
    }
}

impl std::error::Error for GridError {}
