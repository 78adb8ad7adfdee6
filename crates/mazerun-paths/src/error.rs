//! Errors raised before a search starts.

use std::fmt;

use mazerun_core::{CellState, GridError, Point};

/// Why a start or goal coordinate was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidReason {
    /// The coordinate lies outside the grid.
    OutOfBounds,
    /// The coordinate is a wall.
    OnWall,
    /// Start and goal are the same cell.
    StartIsGoal,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OutOfBounds => "out of bounds",
            Self::OnWall => "on a wall",
            Self::StartIsGoal => "start equals goal",
        })
    }
}

/// Errors that can occur when setting up a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Start or goal is unusable.
    InvalidCoordinate { pos: Point, reason: InvalidReason },
    /// The grid has no cell with the given marker.
    MissingMarker(CellState),
    /// The grid has more than one cell with the given marker.
    DuplicateMarker { state: CellState, count: usize },
    /// The grid rejected a write.
    Grid(GridError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate { pos, reason } => {
                write!(f, "search: invalid coordinate {pos}: {reason}")
            }
            Self::MissingMarker(state) => write!(f, "search: grid has no {state} cell"),
            Self::DuplicateMarker { state, count } => {
                write!(f, "search: grid has {count} {state} cells, expected one")
            }
            Self::Grid(e) => write!(f, "search: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for SearchError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = SearchError::InvalidCoordinate {
            pos: Point::new(1, 1),
            reason: InvalidReason::OnWall,
        };
        assert_eq!(err.to_string(), "search: invalid coordinate (1, 1): on a wall");
        assert_eq!(
            SearchError::MissingMarker(CellState::Goal).to_string(),
            "search: grid has no goal cell"
        );
    }

    #[test]
    fn grid_error_is_the_source() {
        use std::error::Error;
        let err = SearchError::from(GridError::EmptyDimensions(mazerun_core::Size::new(0, 0)));
        assert!(err.source().is_some());
    }
}
