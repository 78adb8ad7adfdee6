//! Search configuration.

/// How the frontier orders entries that tie on both f-score and heuristic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// First pushed, first popped.
    #[default]
    InsertionOrder,
    /// Smallest coordinate in row-major order first, then insertion order.
    RowMajor,
}

/// Options for a [`SearchEngine`](crate::SearchEngine).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub tie_break: TieBreak,
    /// Write [`CellState::Visited`](mazerun_core::CellState::Visited) into the
    /// grid for every expanded cell. When off, the grid is left untouched and
    /// observers receive no cell changes.
    pub mark_visited: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::default(),
            mark_visited: true,
        }
    }
}

impl SearchConfig {
    /// Set the tertiary tie-break (builder).
    #[inline]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Enable or disable visited marking (builder).
    #[inline]
    pub const fn with_mark_visited(mut self, mark_visited: bool) -> Self {
        self.mark_visited = mark_visited;
        self
    }
}
