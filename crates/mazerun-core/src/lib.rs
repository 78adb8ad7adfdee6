//! **mazerun-core**: occupancy grids for the mazerun A* engine.
//!
//! This crate provides the types shared by every mazerun crate: geometry
//! primitives, cell states, the owned [`Grid`] model, diff frames, text
//! layouts, a colour palette, and a compact binary recording of search
//! steps.

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;
pub mod layout;
pub mod palette;
pub mod recording;

pub use cell::CellState;
pub use error::GridError;
pub use geom::{Point, Size};
pub use grid::{Frame, FrameCell, Grid, compute_frame};
pub use layout::LayoutError;
pub use palette::{Color, Palette};
pub use recording::{FrameDecoder, FrameEncoder};
