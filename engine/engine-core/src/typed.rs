//! Typed board trait consumed by the search engine
//!
//! A board represents a single position of a two-player placement game. The
//! search only needs three things from it: cheap copies, legality-checked
//! placement, and the side to move. Everything else (capture rules, scoring,
//! rendering) stays inside the game crate.

use std::fmt;
use std::str::FromStr;

/// Stone color, which doubles as the player identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-character symbol used in board diagrams.
    pub fn symbol(self) -> char {
        match self {
            Color::Black => 'X',
            Color::White => 'O',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a color name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected 'black' or 'white'")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" | "x" => Ok(Color::Black),
            "white" | "w" | "o" => Ok(Color::White),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// Outcome of a placement attempt.
///
/// Illegal placements are routine during search, so they are reported as a
/// plain value rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Legal,
    /// Position index is outside the board.
    OutOfRange,
    /// Position already holds a stone.
    Occupied,
    /// The placed stone's own group would have no liberties.
    SelfCapture,
    /// The placement would remove an opponent group (forbidden in NoGo).
    Capture,
}

impl Verdict {
    #[inline]
    pub fn is_legal(self) -> bool {
        self == Verdict::Legal
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Legal => "legal",
            Verdict::OutOfRange => "illegal: out of range",
            Verdict::Occupied => "illegal: occupied",
            Verdict::SelfCapture => "illegal: self-capture",
            Verdict::Capture => "illegal: capture",
        };
        f.write_str(s)
    }
}

/// Board service consumed by the search engine.
///
/// Implementations must be value-like: `clone()` yields an independent copy,
/// and a failed placement leaves the board untouched.
///
/// # Example
///
/// ```rust
/// use engine_core::{Board, Color, Verdict};
///
/// /// Board where any empty cell is legal.
/// #[derive(Debug, Clone)]
/// struct Strip {
///     cells: Vec<Option<Color>>,
///     to_move: Color,
/// }
///
/// impl Board for Strip {
///     fn num_positions(&self) -> usize {
///         self.cells.len()
///     }
///
///     fn side_to_move(&self) -> Color {
///         self.to_move
///     }
///
///     fn place_as(&mut self, position: usize, color: Color) -> Verdict {
///         match self.cells.get(position) {
///             None => Verdict::OutOfRange,
///             Some(Some(_)) => Verdict::Occupied,
///             Some(None) => {
///                 self.cells[position] = Some(color);
///                 self.to_move = color.opponent();
///                 Verdict::Legal
///             }
///         }
///     }
/// }
///
/// let mut strip = Strip { cells: vec![None; 3], to_move: Color::Black };
/// assert!(strip.place(1).is_legal());
/// assert_eq!(strip.side_to_move(), Color::White);
/// assert_eq!(strip.place(1), Verdict::Occupied);
/// ```
pub trait Board: Clone + fmt::Debug {
    /// Total number of positions (`width * height`).
    fn num_positions(&self) -> usize;

    /// The color whose turn it is.
    fn side_to_move(&self) -> Color;

    /// Place a stone of `color` at `position`.
    ///
    /// On success the turn passes to `color.opponent()`. The board does not
    /// need to agree beforehand that it is `color`'s turn.
    fn place_as(&mut self, position: usize, color: Color) -> Verdict;

    /// Place a stone for the side to move.
    fn place(&mut self, position: usize) -> Verdict {
        let color = self.side_to_move();
        self.place_as(position, color)
    }

    /// Check a placement without changing this board.
    ///
    /// The default clones the board and tries the move. Boards that can
    /// answer without a copy should override this; the rollout calls it on
    /// every ply.
    fn is_legal(&self, position: usize, color: Color) -> bool {
        let mut after = self.clone();
        after.place_as(position, color).is_legal()
    }
}
