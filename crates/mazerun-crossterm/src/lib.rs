//! Crossterm terminal renderer for mazerun.
//!
//! Provides a [`TerminalRenderer`] that implements
//! [`mazerun_paths::Observer`], drawing every search iteration to a terminal
//! via crossterm. Each cell is two columns wide so the maze looks square.
//!
//! The renderer paces the animation itself (see
//! [`RendererConfig::frame_delay`]); pressing `q` or `Esc` stops the search
//! at the next iteration boundary.

use std::io::{self, Stdout, Write};
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use mazerun_core::{CellState, Color, Grid, Palette, Point, Size};
use mazerun_paths::{Observation, Observer};

/// Maps a [`mazerun_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    CtColor::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    }
}

/// Black or white, whichever reads better on `bg`.
fn glyph_color(bg: Color) -> Color {
    let luma = 299 * u32::from(bg.r()) + 587 * u32::from(bg.g()) + 114 * u32::from(bg.b());
    if luma > 128_000 {
        Color::from_rgb(0, 0, 0)
    } else {
        Color::from_rgb(0xFF, 0xFF, 0xFF)
    }
}

/// Terminal column and row of a grid cell.
fn screen_pos(p: Point) -> (u16, u16) {
    let col = u16::try_from(p.col.saturating_mul(2)).unwrap_or(u16::MAX);
    let row = u16::try_from(p.row).unwrap_or(u16::MAX);
    (col, row)
}

fn to_u16(v: i32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

/// Settings for [`TerminalRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    /// Pause after drawing each iteration.
    pub frame_delay: Duration,
    /// Draw a colour legend below the grid.
    pub show_legend: bool,
    pub palette: Palette,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_millis(20),
            show_legend: true,
            palette: Palette::default(),
        }
    }
}

/// Draws a search to a terminal, one engine iteration at a time.
///
/// The first observation draws the whole grid; later ones only redraw the
/// cell the previous iteration changed.
pub struct TerminalRenderer<W: Write = Stdout> {
    out: W,
    config: RendererConfig,
    drawn: Option<Size>,
    active: bool,
}

impl TerminalRenderer<Stdout> {
    /// Create a renderer writing to stdout.
    pub fn new(config: RendererConfig) -> Self {
        Self::with_writer(io::stdout(), config)
    }
}

impl Default for TerminalRenderer<Stdout> {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Create a renderer writing to any byte sink.
    ///
    /// Keyboard input is only polled after [`init`](Self::init).
    pub fn with_writer(out: W, config: RendererConfig) -> Self {
        Self {
            out,
            config,
            drawn: None,
            active: false,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Enter raw mode and the alternate screen.
    ///
    /// On failure the terminal is restored before the error is returned.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.drawn = None;
        if let Err(e) = execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        ) {
            self.close();
            return Err(e);
        }
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once; also runs on drop.
    pub fn close(&mut self) {
        if !self.active {
            return;
        }
        let _ = execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        self.active = false;
    }

    /// Redraw the whole grid with `message` on the status line.
    pub fn present(&mut self, grid: &Grid, message: &str) -> io::Result<()> {
        self.draw_grid(grid)?;
        self.draw_status(grid.size(), message)?;
        self.out.flush()
    }

    /// Block until a key is pressed. Returns at once when not initialised.
    pub fn wait_for_key(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        loop {
            if let Event::Key(_) = event::read()? {
                return Ok(());
            }
        }
    }

    fn draw(&mut self, obs: &Observation<'_>) -> io::Result<()> {
        let size = obs.grid.size();
        if self.drawn != Some(size) {
            self.draw_grid(obs.grid)?;
        } else if let Some(fc) = obs.changed {
            self.draw_cell(fc.pos, fc.state)?;
        }
        let status = format!(
            "iteration {:>5}  frontier {:>5}  [q] quit",
            obs.iteration, obs.frontier_len
        );
        self.draw_status(size, &status)?;
        self.out.flush()
    }

    fn draw_grid(&mut self, grid: &Grid) -> io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;
        for (p, state) in grid.iter() {
            self.draw_cell(p, state)?;
        }
        if self.config.show_legend {
            self.draw_legend(grid.size())?;
        }
        self.drawn = Some(grid.size());
        Ok(())
    }

    fn draw_cell(&mut self, p: Point, state: CellState) -> io::Result<()> {
        let bg = self.config.palette.color(state);
        let (col, row) = screen_pos(p);
        queue!(
            self.out,
            cursor::MoveTo(col, row),
            SetBackgroundColor(to_ct_color(bg)),
            SetForegroundColor(to_ct_color(glyph_color(bg))),
            Print(state.glyph()),
            Print(' '),
            ResetColor
        )
    }

    fn draw_status(&mut self, size: Size, message: &str) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, to_u16(size.rows)),
            terminal::Clear(ClearType::UntilNewLine),
            Print(message)
        )
    }

    fn draw_legend(&mut self, size: Size) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, to_u16(size.rows.saturating_add(1))))?;
        for state in CellState::ALL {
            let bg = self.config.palette.color(state);
            queue!(
                self.out,
                SetBackgroundColor(to_ct_color(bg)),
                Print("  "),
                ResetColor,
                Print(format!(" {state}  "))
            )?;
        }
        Ok(())
    }

    /// Whether `q` or `Esc` was pressed since the last poll.
    fn quit_requested(&mut self) -> io::Result<bool> {
        if !self.active {
            return Ok(false);
        }
        while event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<W: Write> Observer for TerminalRenderer<W> {
    fn observe(&mut self, obs: &Observation<'_>) -> ControlFlow<()> {
        if let Err(e) = self.draw(obs) {
            log::warn!("terminal draw failed at iteration {}: {e}", obs.iteration);
        }
        match self.quit_requested() {
            Ok(true) => {
                log::debug!("quit requested at iteration {}", obs.iteration);
                return ControlFlow::Break(());
            }
            Ok(false) => {}
            Err(e) => log::warn!("terminal input poll failed: {e}"),
        }
        if !self.config.frame_delay.is_zero() {
            thread::sleep(self.config.frame_delay);
        }
        ControlFlow::Continue(())
    }
}
