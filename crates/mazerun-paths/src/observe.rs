//! The observation hook: how renderers and recorders follow a search.
//!
//! The engine calls [`Observer::observe`] once per iteration, before popping
//! from the frontier, and waits for it to return. Observers only ever see a
//! shared borrow of the grid, so they cannot influence the search except by
//! asking it to stop.

use std::io::{self, Write};
use std::ops::ControlFlow;

use mazerun_core::{Frame, FrameCell, FrameEncoder, Grid, GridError};

/// What an observer is shown at the start of an iteration.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    /// Zero-based index of the iteration about to run.
    pub iteration: u64,
    /// The grid as it stands now.
    pub grid: &'a Grid,
    /// The cell the previous iteration changed, if any.
    pub changed: Option<FrameCell>,
    /// Entries waiting in the frontier, stale ones included.
    pub frontier_len: usize,
}

/// Receives one [`Observation`] per engine iteration.
///
/// Returning [`ControlFlow::Break`] stops the engine at this iteration
/// boundary; the engine stays resumable.
pub trait Observer {
    fn observe(&mut self, obs: &Observation<'_>) -> ControlFlow<()>;
}

impl<F: FnMut(&Observation<'_>) -> ControlFlow<()>> Observer for F {
    #[inline]
    fn observe(&mut self, obs: &Observation<'_>) -> ControlFlow<()> {
        self(obs)
    }
}

/// An observer that ignores everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    #[inline]
    fn observe(&mut self, _obs: &Observation<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// Records the replayable step sequence of a search.
///
/// The first observation is stored as a full keyframe; every later one as a
/// diff frame holding the single changed cell (or nothing).
///
/// An iteration is recorded once. When the engine is stopped and resumed it
/// shows the same iteration again, and the repeat is skipped. A search
/// stopped at iteration `n` leaves `n + 1` frames: the last one is the state
/// the stop happened on.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    frames: Vec<Frame>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded frames, one per observed iteration.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Stream every frame through `enc`.
    pub fn write_to<W: Write>(&self, enc: &mut FrameEncoder<W>) -> io::Result<()> {
        for frame in &self.frames {
            enc.encode(frame)?;
        }
        enc.flush()
    }

    /// Rebuild the last observed grid from the recorded frames.
    ///
    /// Returns `Ok(None)` when nothing was recorded.
    pub fn replay(&self) -> Result<Option<Grid>, GridError> {
        replay(&self.frames)
    }
}

impl Observer for Recorder {
    fn observe(&mut self, obs: &Observation<'_>) -> ControlFlow<()> {
        if self.frames.last().is_some_and(|f| f.iteration == obs.iteration) {
            return ControlFlow::Continue(());
        }
        let frame = if self.frames.is_empty() {
            Frame::full(obs.grid, obs.iteration)
        } else {
            Frame {
                iteration: obs.iteration,
                size: obs.grid.size(),
                cells: obs.changed.into_iter().collect(),
            }
        };
        self.frames.push(frame);
        ControlFlow::Continue(())
    }
}

/// Apply `frames` in order onto a blank grid sized after the first frame.
pub fn replay(frames: &[Frame]) -> Result<Option<Grid>, GridError> {
    let Some(first) = frames.first() else {
        return Ok(None);
    };
    let mut grid = Grid::new(first.size.rows, first.size.cols)?;
    for frame in frames {
        frame.apply(&mut grid);
    }
    Ok(Some(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazerun_core::{CellState, Point};

    fn observation(grid: &Grid, iteration: u64, changed: Option<FrameCell>) -> Observation<'_> {
        Observation {
            iteration,
            grid,
            changed,
            frontier_len: 1,
        }
    }

    #[test]
    fn closures_are_observers() {
        let grid = Grid::new(2, 2).unwrap();
        let mut seen = Vec::new();
        let mut obs = |o: &Observation<'_>| {
            seen.push(o.iteration);
            if o.iteration >= 1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        assert!(obs.observe(&observation(&grid, 0, None)).is_continue());
        assert!(obs.observe(&observation(&grid, 1, None)).is_break());
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn recorder_keyframe_then_diffs() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set_state(Point::new(0, 0), CellState::Start).unwrap();
        let mut rec = Recorder::new();
        let _ = rec.observe(&observation(&grid, 0, None));

        let change = FrameCell {
            pos: Point::new(0, 1),
            state: CellState::Visited,
        };
        grid.set_state(change.pos, change.state).unwrap();
        let _ = rec.observe(&observation(&grid, 1, Some(change)));

        assert_eq!(rec.frames().len(), 2);
        assert_eq!(rec.frames()[0].cells.len(), 3);
        assert_eq!(rec.frames()[1].cells, vec![change]);
        assert_eq!(rec.replay().unwrap(), Some(grid));
    }

    #[test]
    fn recorder_skips_a_repeated_iteration() {
        let grid = Grid::new(1, 2).unwrap();
        let mut rec = Recorder::new();
        let _ = rec.observe(&observation(&grid, 0, None));
        let _ = rec.observe(&observation(&grid, 1, None));
        let _ = rec.observe(&observation(&grid, 1, None));
        let _ = rec.observe(&observation(&grid, 2, None));
        let iterations: Vec<u64> = rec.frames().iter().map(|f| f.iteration).collect();
        assert_eq!(iterations, vec![0, 1, 2]);
    }

    #[test]
    fn replay_of_nothing() {
        assert_eq!(replay(&[]).unwrap(), None);
    }

    #[test]
    fn write_to_encodes_every_frame() {
        let grid = Grid::new(1, 1).unwrap();
        let mut rec = Recorder::new();
        let _ = rec.observe(&observation(&grid, 0, None));
        let _ = rec.observe(&observation(&grid, 1, None));

        let mut enc = FrameEncoder::new(Vec::new());
        rec.write_to(&mut enc).unwrap();
        let bytes = enc.into_inner();
        let decoded: Vec<Frame> = mazerun_core::FrameDecoder::new(bytes.as_slice())
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(decoded, rec.into_frames());
    }
}
