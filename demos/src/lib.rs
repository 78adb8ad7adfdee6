//! Shared pieces of the `maze-runner` demo: argument parsing, layout
//! loading and the search driver.
//!
//! Demonstrates: text layouts, observed step-by-step A*, terminal rendering,
//! path marking and binary step recording.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mazerun_core::{FrameEncoder, Grid, LayoutError, layout};
use mazerun_crossterm::{RendererConfig, TerminalRenderer};
use mazerun_paths::{
    Observation, Observer, Outcome, Recorder, SearchConfig, SearchEngine, SearchError, TieBreak,
};

/// Maze used when no layout file is given.
pub const DEFAULT_LAYOUT: &str = "\
S...#...............
.##.#.#####.#######.
.#..#.....#.#.......
.#.######.#.#.######
.#......#.#.#.......
.######.#.#.######..
......#.#.#......#..
.####.#.#.######.#..
.#....#.#........#..
.#.####.##########..
.#..................
.##################G";

pub const USAGE: &str = "\
Usage: maze-runner [LAYOUT_FILE] [OPTIONS]

Layout files use one character per cell:
  . empty   # wall   S start   G goal

Options:
  --record FILE   write every search step to FILE
  --headless      print the result instead of animating it
  --delay MS      pause between animation frames (default 20)
  --row-major     break score ties by position instead of insertion order
  -h, --help      show this message";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub layout: Option<PathBuf>,
    pub record: Option<PathBuf>,
    pub headless: bool,
    pub delay: Duration,
    pub tie_break: TieBreak,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            layout: None,
            record: None,
            headless: false,
            delay: RendererConfig::default().frame_delay,
            tie_break: TieBreak::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Options),
    Help,
}

/// Command-line errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue(&'static str),
    InvalidDelay(String),
    UnknownFlag(String),
    ExtraArgument(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue(flag) => write!(f, "{flag} needs a value"),
            Self::InvalidDelay(v) => write!(f, "invalid delay {v:?}: expected milliseconds"),
            Self::UnknownFlag(flag) => write!(f, "unknown option {flag}"),
            Self::ExtraArgument(arg) => write!(f, "unexpected argument {arg:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Parse arguments, program name excluded.
pub fn parse_args<I>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--headless" => opts.headless = true,
            "--row-major" => opts.tie_break = TieBreak::RowMajor,
            "--record" => {
                let file = args.next().ok_or(ArgsError::MissingValue("--record"))?;
                opts.record = Some(PathBuf::from(file));
            }
            "--delay" => {
                let ms = args.next().ok_or(ArgsError::MissingValue("--delay"))?;
                let ms: u64 = ms.parse().map_err(|_| ArgsError::InvalidDelay(ms.clone()))?;
                opts.delay = Duration::from_millis(ms);
            }
            flag if flag.starts_with('-') => return Err(ArgsError::UnknownFlag(arg)),
            _ if opts.layout.is_none() => opts.layout = Some(PathBuf::from(arg)),
            _ => return Err(ArgsError::ExtraArgument(arg)),
        }
    }
    Ok(Command::Run(opts))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that can stop the demo.
#[derive(Debug)]
pub enum DemoError {
    File { path: PathBuf, source: io::Error },
    Layout(LayoutError),
    Search(SearchError),
    Io(io::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Layout(e) => write!(f, "bad layout: {e}"),
            Self::Search(e) => write!(f, "cannot search: {e}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::File { source, .. } => Some(source),
            Self::Layout(e) => Some(e),
            Self::Search(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<LayoutError> for DemoError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

impl From<SearchError> for DemoError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

impl From<io::Error> for DemoError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

/// Result of one demo run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// `None` when the user stopped the search early.
    pub outcome: Option<Outcome>,
    pub iterations: u64,
    pub visited: usize,
    pub cost: Option<i32>,
    /// Cells on the marked path, start and goal included. Zero unless found.
    pub path_len: usize,
    /// Number of recorded step frames.
    pub frames: usize,
    /// Final grid as a text layout, path marked when found.
    pub grid: String,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.outcome, self.cost) {
            (Some(Outcome::Found), Some(cost)) => write!(f, "found: cost {cost}")?,
            (Some(outcome), _) => write!(f, "{outcome}")?,
            (None, _) => write!(f, "stopped")?,
        }
        write!(
            f,
            ", {} cells visited in {} iterations",
            self.visited, self.iterations
        )
    }
}

/// Forwards every observation to several observers.
///
/// Stops the search if any of them asks to, after all have been told.
pub struct Broadcast<'a> {
    observers: Vec<&'a mut dyn Observer>,
}

impl<'a> Broadcast<'a> {
    pub fn new(observers: Vec<&'a mut dyn Observer>) -> Self {
        Self { observers }
    }
}

impl Observer for Broadcast<'_> {
    fn observe(&mut self, obs: &Observation<'_>) -> ControlFlow<()> {
        let mut flow = ControlFlow::Continue(());
        for o in &mut self.observers {
            if o.observe(obs).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        flow
    }
}

/// Read and parse a layout file, or the built-in maze when `path` is `None`.
pub fn load_grid(path: Option<&Path>) -> Result<Grid, DemoError> {
    let text = match path {
        Some(path) => fs::read_to_string(path).map_err(|source| DemoError::File {
            path: path.to_path_buf(),
            source,
        })?,
        None => DEFAULT_LAYOUT.to_owned(),
    };
    Ok(layout::parse(&text)?)
}

/// Run a search on `grid`'s own Start/Goal markers, marking the path once found.
pub fn search(
    grid: &mut Grid,
    config: SearchConfig,
    observer: &mut dyn Observer,
) -> Result<Summary, DemoError> {
    let mut engine = SearchEngine::from_markers(grid, config)?;
    let outcome = engine.run(observer);
    let path_len = match outcome {
        Some(Outcome::Found) => match engine.mark_path() {
            Some(path) => path.len(),
            None => {
                log::warn!("search found the goal but the path could not be marked");
                0
            }
        },
        _ => 0,
    };
    log::debug!("demo search finished: {engine:?}");
    Ok(Summary {
        outcome,
        iterations: engine.iterations(),
        visited: engine.visited().len(),
        cost: engine.path_cost(),
        path_len,
        frames: 0,
        grid: layout::render(engine.grid()),
    })
}

/// Run the demo described by `opts`.
pub fn run(opts: &Options) -> Result<Summary, DemoError> {
    let mut grid = load_grid(opts.layout.as_deref())?;
    let config = SearchConfig::default().with_tie_break(opts.tie_break);
    let mut recorder = Recorder::new();

    let mut summary = if opts.headless {
        search(&mut grid, config, &mut recorder)?
    } else {
        let mut renderer = TerminalRenderer::new(RendererConfig {
            frame_delay: opts.delay,
            ..RendererConfig::default()
        });
        renderer.init()?;
        let result = {
            let observers: Vec<&mut dyn Observer> = vec![&mut renderer, &mut recorder];
            search(&mut grid, config, &mut Broadcast::new(observers))
        };
        let result = result.and_then(|summary| {
            renderer.present(&grid, &format!("{summary}  [any key] exit"))?;
            renderer.wait_for_key()?;
            Ok(summary)
        });
        renderer.close();
        result?
    };

    summary.frames = recorder.frames().len();
    if let Some(path) = &opts.record {
        let file = File::create(path).map_err(|source| DemoError::File {
            path: path.clone(),
            source,
        })?;
        let mut enc = FrameEncoder::new(BufWriter::new(file));
        recorder.write_to(&mut enc)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazerun_core::FrameDecoder;
    use mazerun_paths::NoopObserver;

    fn args(list: &[&str]) -> Result<Command, ArgsError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_uses_defaults() {
        assert_eq!(args(&[]), Ok(Command::Run(Options::default())));
    }

    #[test]
    fn every_option_parses() {
        let Ok(Command::Run(opts)) = args(&[
            "maze.txt",
            "--record",
            "run.bin",
            "--headless",
            "--delay",
            "5",
            "--row-major",
        ]) else {
            panic!("expected options");
        };
        assert_eq!(opts.layout, Some(PathBuf::from("maze.txt")));
        assert_eq!(opts.record, Some(PathBuf::from("run.bin")));
        assert!(opts.headless);
        assert_eq!(opts.delay, Duration::from_millis(5));
        assert_eq!(opts.tie_break, TieBreak::RowMajor);
    }

    #[test]
    fn help_wins() {
        assert_eq!(args(&["--headless", "-h"]), Ok(Command::Help));
    }

    #[test]
    fn bad_arguments() {
        assert_eq!(args(&["--record"]), Err(ArgsError::MissingValue("--record")));
        assert_eq!(
            args(&["--delay", "soon"]),
            Err(ArgsError::InvalidDelay("soon".into()))
        );
        assert_eq!(args(&["--fast"]), Err(ArgsError::UnknownFlag("--fast".into())));
        assert_eq!(
            args(&["a.txt", "b.txt"]),
            Err(ArgsError::ExtraArgument("b.txt".into()))
        );
    }

    #[test]
    fn default_maze_is_solvable() {
        let mut grid = load_grid(None).unwrap();
        let summary = search(&mut grid, SearchConfig::default(), &mut NoopObserver).unwrap();
        assert_eq!(summary.outcome, Some(Outcome::Found));
        assert_eq!(summary.cost, Some(32));
        assert_eq!(summary.path_len, 33);
        assert_eq!(summary.grid.matches('*').count(), 31);
        assert!(summary.to_string().starts_with("found: cost 32"));
    }

    #[test]
    fn missing_layout_file_names_the_path() {
        let err = load_grid(Some(Path::new("/nonexistent/maze.txt"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/maze.txt"));
    }

    #[test]
    fn broadcast_stops_when_any_observer_does() {
        let grid = Grid::new(1, 2).unwrap();
        let mut recorder = Recorder::new();
        let mut stop = |_: &Observation<'_>| ControlFlow::Break(());
        let observers: Vec<&mut dyn Observer> = vec![&mut recorder, &mut stop];
        let mut all = Broadcast::new(observers);
        let obs = Observation {
            iteration: 0,
            grid: &grid,
            changed: None,
            frontier_len: 1,
        };
        assert!(all.observe(&obs).is_break());
        drop(all);
        assert_eq!(recorder.frames().len(), 1);
    }

    #[test]
    fn headless_run_records_every_step() {
        let path = std::env::temp_dir().join(format!("mazerun-{}.bin", std::process::id()));
        let opts = Options {
            headless: true,
            record: Some(path.clone()),
            ..Options::default()
        };
        let summary = run(&opts).unwrap();
        let file = File::open(&path).unwrap();
        let frames = FrameDecoder::new(io::BufReader::new(file))
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(frames.len(), summary.frames);
        assert_eq!(frames.len() as u64, summary.iterations);
    }

    #[test]
    fn unreachable_goal_is_reported() {
        let mut grid = layout::parse("S#.\n##.\n..G").unwrap();
        let summary = search(&mut grid, SearchConfig::default(), &mut NoopObserver).unwrap();
        assert_eq!(summary.outcome, Some(Outcome::NotFound));
        assert_eq!(summary.path_len, 0);
        assert_eq!(summary.to_string(), "not found, 1 cells visited in 2 iterations");
    }

    #[test]
    fn stopped_then_resumed_run_records_each_iteration_once() {
        let mut grid = load_grid(None).unwrap();
        let mut engine = SearchEngine::from_markers(&mut grid, SearchConfig::default()).unwrap();
        let mut recorder = Recorder::new();
        let mut quit = |o: &Observation<'_>| {
            if o.iteration == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        let stopped = {
            let observers: Vec<&mut dyn Observer> = vec![&mut recorder, &mut quit];
            engine.run(&mut Broadcast::new(observers))
        };
        assert_eq!(stopped, None);
        assert_eq!(engine.iterations(), 5);
        assert_eq!(recorder.frames().len(), 6);

        assert_eq!(engine.run(&mut recorder), Some(Outcome::Found));
        assert_eq!(recorder.frames().len() as u64, engine.iterations());
        let iterations: Vec<u64> = recorder.frames().iter().map(|f| f.iteration).collect();
        assert!(iterations.windows(2).all(|w| w[0] + 1 == w[1]));
    }
}
