//! The [`CellState`] type: what occupies a single grid cell.

use std::fmt;

/// State of one grid cell.
///
/// The discriminants are stable and used by the step recording format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CellState {
    #[default]
    Empty = 0,
    Wall = 1,
    Start = 2,
    Goal = 3,
    Visited = 4,
    Path = 5,
}

impl CellState {
    /// Every state, in discriminant order.
    pub const ALL: [CellState; 6] = [
        CellState::Empty,
        CellState::Wall,
        CellState::Start,
        CellState::Goal,
        CellState::Visited,
        CellState::Path,
    ];

    /// Character used by text layouts.
    #[inline]
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Start => 'S',
            Self::Goal => 'G',
            Self::Visited => '+',
            Self::Path => '*',
        }
    }

    /// Parse a layout character. A space reads as [`CellState::Empty`].
    #[inline]
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' | ' ' => Some(Self::Empty),
            '#' => Some(Self::Wall),
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            '+' => Some(Self::Visited),
            '*' => Some(Self::Path),
            _ => None,
        }
    }

    /// Stable numeric code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`code`](CellState::code).
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Wall),
            2 => Some(Self::Start),
            3 => Some(Self::Goal),
            4 => Some(Self::Visited),
            5 => Some(Self::Path),
            _ => None,
        }
    }

    /// Whether a path may pass through a cell in this state.
    #[inline]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Whether the state is a search marking (cleared between runs).
    #[inline]
    pub const fn is_search_mark(self) -> bool {
        matches!(self, Self::Visited | Self::Path)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Wall => "wall",
            Self::Start => "start",
            Self::Goal => "goal",
            Self::Visited => "visited",
            Self::Path => "path",
        };
        f.write_str(name)
    }
}
