//! Display colours: [`Color`] and the [`Palette`] mapping cell states to it.
//!
//! Renderers pick colours from here so every front end shows the same
//! mapping: start stays green and goal stays red even once the search has
//! settled them.

use crate::cell::CellState;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Red component.
    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green component.
    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue component.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// One colour per [`CellState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    pub empty: Color,
    pub wall: Color,
    pub start: Color,
    pub goal: Color,
    pub visited: Color,
    pub path: Color,
}

impl Palette {
    /// Dark background, grey walls, green start, red goal.
    pub const DARK: Self = Self {
        empty: Color::from_rgb(0, 0, 0),
        wall: Color::from_rgb(0x33, 0x33, 0x33),
        start: Color::from_rgb(0, 0xFF, 0),
        goal: Color::from_rgb(0xFF, 0, 0),
        visited: Color::from_rgb(0, 0x44, 0),
        path: Color::from_rgb(0, 0xAA, 0),
    };

    /// White background, black walls, blue visited cells.
    pub const LIGHT: Self = Self {
        empty: Color::from_rgb(0xFF, 0xFF, 0xFF),
        wall: Color::from_rgb(0, 0, 0),
        start: Color::from_rgb(0, 0xFF, 0),
        goal: Color::from_rgb(0xFF, 0, 0),
        visited: Color::from_rgb(0, 0, 0xFF),
        path: Color::from_rgb(0xFF, 0xC8, 0),
    };

    /// Colour for `state`.
    #[inline]
    pub const fn color(&self, state: CellState) -> Color {
        match state {
            CellState::Empty => self.empty,
            CellState::Wall => self.wall,
            CellState::Start => self.start,
            CellState::Goal => self.goal,
            CellState::Visited => self.visited,
            CellState::Path => self.path,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DARK
    }
}
