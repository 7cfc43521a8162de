//! Placement move value.

use std::fmt;

use crate::typed::{Board, Color, Verdict};

/// A single placement: a stone of `color` at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Place {
    position: usize,
    color: Color,
}

impl Place {
    pub fn new(position: usize, color: Color) -> Self {
        Self { position, color }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Apply this placement to `board`.
    ///
    /// The board is modified only when the verdict is [`Verdict::Legal`].
    pub fn apply<B: Board>(&self, board: &mut B) -> Verdict {
        board.place_as(self.position, self.color)
    }

    /// Check whether this placement would be legal on `board`.
    pub fn is_legal_on<B: Board>(&self, board: &B) -> bool {
        board.is_legal(self.position, self.color)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.color, self.position)
    }
}
