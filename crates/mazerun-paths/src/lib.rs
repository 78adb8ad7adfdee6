//! Deterministic A* search over mazerun grids.
//!
//! The search is split into small pieces that can be used on their own:
//!
//! - the [`manhattan`] heuristic and the [`Heuristic`] trait,
//! - the [`Frontier`], a min-queue keyed by `(f, h)` with a configurable
//!   [`TieBreak`],
//! - the [`ScoreTable`] of g/f scores,
//! - the [`SearchEngine`], which drives them one iteration at a time and
//!   reports every iteration to an [`Observer`].
//!
//! For a one-shot search without observation, use [`astar`].
//!
//! ```
//! use mazerun_core::{Grid, Point};
//! use mazerun_paths::{astar, Outcome};
//!
//! let mut grid = Grid::new(5, 5).unwrap();
//! let report = astar(&mut grid, Point::new(0, 0), Point::new(4, 4)).unwrap();
//! assert_eq!(report.outcome, Outcome::Found);
//! assert_eq!(report.cost, Some(8));
//! ```

mod config;
mod distance;
mod engine;
mod error;
mod frontier;
mod observe;
mod scores;
mod traits;

pub use config::{SearchConfig, TieBreak};
pub use distance::manhattan;
pub use engine::{Outcome, SearchEngine, SearchReport, SearchState, Step, astar};
pub use error::{InvalidReason, SearchError};
pub use frontier::{EmptyFrontier, Frontier, FrontierEntry};
pub use observe::{NoopObserver, Observation, Observer, Recorder, replay};
pub use scores::{ScoreTable, UNREACHABLE};
pub use traits::{Heuristic, Manhattan};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let config = SearchConfig::default()
            .with_tie_break(TieBreak::RowMajor)
            .with_mark_visited(false);
        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn config_fields_default_when_missing() {
        let config: SearchConfig = serde_json::from_str(r#"{"tie_break":"RowMajor"}"#).unwrap();
        assert_eq!(config.tie_break, TieBreak::RowMajor);
        assert!(config.mark_visited);
    }

    #[test]
    fn outcome_round_trip() {
        for outcome in [Outcome::Found, Outcome::NotFound] {
            let json = serde_json::to_string(&outcome).unwrap();
            let back: Outcome = serde_json::from_str(&json).unwrap();
            assert_eq!(outcome, back);
        }
        let state: SearchState = serde_json::from_str("\"Running\"").unwrap();
        assert_eq!(state, SearchState::Running);
    }
}
