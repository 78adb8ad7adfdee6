//! The A* search engine.
//!
//! [`SearchEngine`] borrows a [`Grid`] mutably for the whole run, expands
//! one cell per [`step`](SearchEngine::step), and reports every iteration to
//! an [`Observer`]. Given the same grid, start, goal and configuration, the
//! sequence of expanded cells and the outcome are always identical.

use std::fmt;

use log::{debug, trace};
use mazerun_core::{CellState, FrameCell, Grid, Point};

use crate::config::SearchConfig;
use crate::error::{InvalidReason, SearchError};
use crate::frontier::{EmptyFrontier, Frontier, FrontierEntry};
use crate::observe::{NoopObserver, Observation, Observer};
use crate::scores::ScoreTable;
use crate::traits::{Heuristic, Manhattan};

/// Terminal result of a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Found,
    NotFound,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Found => "found",
            Self::NotFound => "not found",
        })
    }
}

/// Lifecycle of a [`SearchEngine`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    /// Created, nothing popped yet.
    Initialized,
    Running,
    /// The goal was popped. Terminal.
    Found,
    /// The frontier ran dry first. Terminal.
    NotFound,
}

impl SearchState {
    /// The outcome, once terminal.
    #[inline]
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Found => Some(Outcome::Found),
            Self::NotFound => Some(Outcome::NotFound),
            Self::Initialized | Self::Running => None,
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self.outcome().is_some()
    }
}

/// What a single call to [`SearchEngine::step`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The cell was settled and its neighbours relaxed.
    Expanded(Point),
    Found,
    NotFound,
    /// The observer asked to stop before anything was popped.
    Stopped,
}

/// Summary of a finished search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: Outcome,
    /// Expanded cells, in order.
    pub visited: Vec<Point>,
    /// Start to goal, both included. Empty when not found.
    pub path: Vec<Point>,
    /// g-score of the goal, when found.
    pub cost: Option<i32>,
    pub iterations: u64,
}

/// Incremental A* over a borrowed grid.
///
/// Precondition: nothing but the engine mutates the grid while it runs,
/// which the `&'g mut Grid` borrow enforces.
pub struct SearchEngine<'g, H: Heuristic = Manhattan> {
    grid: &'g mut Grid,
    heuristic: H,
    config: SearchConfig,
    start: Point,
    goal: Point,
    scores: ScoreTable,
    frontier: Frontier,
    state: SearchState,
    visited: Vec<Point>,
    iterations: u64,
    last_change: Option<FrameCell>,
}

impl<'g> SearchEngine<'g, Manhattan> {
    /// Prepare a search from `start` to `goal` with the default
    /// configuration and the Manhattan heuristic.
    pub fn new(grid: &'g mut Grid, start: Point, goal: Point) -> Result<Self, SearchError> {
        Self::with_config(grid, start, goal, SearchConfig::default())
    }

    /// Prepare a search with an explicit configuration.
    pub fn with_config(
        grid: &'g mut Grid,
        start: Point,
        goal: Point,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        SearchEngine::with_heuristic(grid, start, goal, config, Manhattan)
    }

    /// Prepare a search between the grid's own `Start` and `Goal` cells.
    ///
    /// Each marker must appear exactly once.
    pub fn from_markers(grid: &'g mut Grid, config: SearchConfig) -> Result<Self, SearchError> {
        let start = unique_marker(grid, CellState::Start)?;
        let goal = unique_marker(grid, CellState::Goal)?;
        Self::with_config(grid, start, goal, config)
    }
}

fn unique_marker(grid: &Grid, state: CellState) -> Result<Point, SearchError> {
    match grid.count(state) {
        0 => Err(SearchError::MissingMarker(state)),
        1 => grid.find(state).ok_or(SearchError::MissingMarker(state)),
        count => Err(SearchError::DuplicateMarker { state, count }),
    }
}

fn validate(grid: &Grid, p: Point) -> Result<(), SearchError> {
    let reason = match grid.get_state(p) {
        None => InvalidReason::OutOfBounds,
        Some(CellState::Wall) => InvalidReason::OnWall,
        Some(_) => return Ok(()),
    };
    Err(SearchError::InvalidCoordinate { pos: p, reason })
}

impl<'g, H: Heuristic> SearchEngine<'g, H> {
    /// Prepare a search with a custom heuristic.
    ///
    /// Fails fast if start or goal is out of bounds or on a wall, or if they
    /// coincide. On success the start and goal cells are marked `Start` and
    /// `Goal`, and any other `Start` / `Goal` marker is cleared.
    pub fn with_heuristic(
        grid: &'g mut Grid,
        start: Point,
        goal: Point,
        config: SearchConfig,
        heuristic: H,
    ) -> Result<Self, SearchError> {
        validate(grid, start)?;
        validate(grid, goal)?;
        if start == goal {
            return Err(SearchError::InvalidCoordinate {
                pos: start,
                reason: InvalidReason::StartIsGoal,
            });
        }

        let stray: Vec<Point> = grid
            .iter()
            .filter(|&(p, s)| {
                (s == CellState::Start && p != start) || (s == CellState::Goal && p != goal)
            })
            .map(|(p, _)| p)
            .collect();
        for p in stray {
            grid.set_state(p, CellState::Empty)?;
        }
        grid.set_state(start, CellState::Start)?;
        grid.set_state(goal, CellState::Goal)?;

        let mut scores = ScoreTable::new(grid.size());
        let mut frontier = Frontier::new(config.tie_break);
        let h = heuristic.estimate(start, goal);
        scores.set(start, 0, h, None);
        frontier.push(FrontierEntry::new(h, h, start));

        debug!(
            "astar: {start} -> {goal} on {} grid, estimate {h}, {:?}",
            grid.size(),
            config.tie_break
        );

        Ok(Self {
            grid,
            heuristic,
            config,
            start,
            goal,
            scores,
            frontier,
            state: SearchState::Initialized,
            visited: Vec::new(),
            iterations: 0,
            last_change: None,
        })
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Run one iteration: notify `observer`, pop the best fresh entry, and
    /// either finish or expand it.
    ///
    /// Once the engine is terminal this returns the terminal step again
    /// without notifying the observer or touching any state.
    pub fn step<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Step {
        match self.state {
            SearchState::Found => return Step::Found,
            SearchState::NotFound => return Step::NotFound,
            SearchState::Initialized | SearchState::Running => {}
        }

        let obs = Observation {
            iteration: self.iterations,
            grid: &*self.grid,
            changed: self.last_change,
            frontier_len: self.frontier.len(),
        };
        if observer.observe(&obs).is_break() {
            trace!("astar: stopped by observer at iteration {}", self.iterations);
            return Step::Stopped;
        }

        self.state = SearchState::Running;
        self.iterations += 1;
        self.last_change = None;

        let current = match self.pop_fresh() {
            Ok(entry) => entry.pos,
            Err(EmptyFrontier) => {
                self.finish(SearchState::NotFound);
                return Step::NotFound;
            }
        };

        if current == self.goal {
            self.finish(SearchState::Found);
            return Step::Found;
        }

        self.settle(current);
        self.relax(current);
        Step::Expanded(current)
    }

    /// Step until the search ends or `observer` stops it.
    ///
    /// Returns `None` when stopped; calling `run` or `step` again resumes.
    pub fn run<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Option<Outcome> {
        loop {
            match self.step(observer) {
                Step::Expanded(_) => {}
                Step::Found => return Some(Outcome::Found),
                Step::NotFound => return Some(Outcome::NotFound),
                Step::Stopped => return None,
            }
        }
    }

    /// Pop until an entry matches its cell's current g-score.
    fn pop_fresh(&mut self) -> Result<FrontierEntry, EmptyFrontier> {
        loop {
            let entry = self.frontier.pop_min()?;
            if entry.g() == self.scores.g(entry.pos) {
                return Ok(entry);
            }
            trace!(
                "astar: discard stale {} (g {} != {})",
                entry.pos,
                entry.g(),
                self.scores.g(entry.pos)
            );
        }
    }

    fn settle(&mut self, p: Point) {
        trace!("astar: expand {p} g={} f={}", self.scores.g(p), self.scores.f(p));
        self.visited.push(p);
        if !self.config.mark_visited {
            return;
        }
        // Start and goal keep their marker so renderers can still tell them apart.
        if matches!(self.grid.get_state(p), Some(CellState::Start | CellState::Goal)) {
            return;
        }
        if self.grid.set_state(p, CellState::Visited).is_ok() {
            self.last_change = Some(FrameCell {
                pos: p,
                state: CellState::Visited,
            });
        }
    }

    fn relax(&mut self, current: Point) {
        let g = self.scores.g(current);
        for n in current.neighbors_4() {
            if !self.grid.is_traversable(n) {
                continue;
            }
            let tentative = g + 1;
            if tentative < self.scores.g(n) {
                let h = self.heuristic.estimate(n, self.goal);
                let f = tentative + h;
                self.scores.set(n, tentative, f, Some(current));
                self.frontier.push(FrontierEntry::new(f, h, n));
            }
        }
    }

    fn finish(&mut self, state: SearchState) {
        self.state = state;
        debug!(
            "astar: {:?} after {} iterations, {} cells expanded, {} entries left",
            state,
            self.iterations,
            self.visited.len(),
            self.frontier.len()
        );
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The outcome, once terminal.
    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    #[inline]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// The grid being searched.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    /// Best known cost from start, [`UNREACHABLE`](crate::UNREACHABLE) if not reached.
    #[inline]
    pub fn g_score(&self, p: Point) -> i32 {
        self.scores.g(p)
    }

    /// g-score plus heuristic, [`UNREACHABLE`](crate::UNREACHABLE) if not reached.
    #[inline]
    pub fn f_score(&self, p: Point) -> i32 {
        self.scores.f(p)
    }

    /// Heuristic estimate from `p` to the goal.
    #[inline]
    pub fn estimate(&self, p: Point) -> i32 {
        self.heuristic.estimate(p, self.goal)
    }

    /// The full score table.
    #[inline]
    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Cells expanded so far, in order. Never contains the goal.
    #[inline]
    pub fn visited(&self) -> &[Point] {
        &self.visited
    }

    /// Iterations run so far (observer calls that were not stopped).
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Entries still queued, stale ones included.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Cost of the path to the goal, once found.
    pub fn path_cost(&self) -> Option<i32> {
        match self.state {
            SearchState::Found => Some(self.scores.g(self.goal)),
            _ => None,
        }
    }

    /// The optimal path, start and goal included, once found.
    pub fn path(&self) -> Option<Vec<Point>> {
        if self.state != SearchState::Found {
            return None;
        }
        let mut path = vec![self.goal];
        let mut cur = self.goal;
        while let Some(prev) = self.scores.parent(cur) {
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        debug_assert_eq!(path.first(), Some(&self.start));
        Some(path)
    }

    /// Write [`CellState::Path`] onto the path's intermediate cells and
    /// return the path. `None` unless found.
    pub fn mark_path(&mut self) -> Option<Vec<Point>> {
        let path = self.path()?;
        let inner = path.len().saturating_sub(1);
        for &p in path.iter().take(inner).skip(1) {
            if self.grid.set_state(p, CellState::Path).is_err() {
                return None;
            }
        }
        Some(path)
    }

    /// Summary of the run, once terminal.
    pub fn report(&self) -> Option<SearchReport> {
        self.outcome().map(|outcome| self.summarise(outcome))
    }

    fn summarise(&self, outcome: Outcome) -> SearchReport {
        SearchReport {
            outcome,
            visited: self.visited.clone(),
            path: self.path().unwrap_or_default(),
            cost: self.path_cost(),
            iterations: self.iterations,
        }
    }
}

impl<H: Heuristic> fmt::Debug for SearchEngine<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("start", &self.start)
            .field("goal", &self.goal)
            .field("state", &self.state)
            .field("iterations", &self.iterations)
            .field("visited", &self.visited.len())
            .field("frontier", &self.frontier.len())
            .finish()
    }
}

/// Run a whole search from `start` to `goal` without observation.
pub fn astar(grid: &mut Grid, start: Point, goal: Point) -> Result<SearchReport, SearchError> {
    let mut engine = SearchEngine::new(grid, start, goal)?;
    let outcome = loop {
        if let Some(outcome) = engine.run(&mut NoopObserver) {
            break outcome;
        }
    };
    Ok(engine.summarise(outcome))
}
