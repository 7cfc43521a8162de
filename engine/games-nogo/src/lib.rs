//! NoGo board implementation
//!
//! NoGo is played on a Go board, but the goal is inverted: a placement that
//! captures an opponent group or leaves the placer's own group without
//! liberties is illegal. The first player without a legal placement loses.
//! There is no passing.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Board, Color, Verdict};
//! use games_nogo::NoGoBoard;
//!
//! let mut board = NoGoBoard::standard();
//! assert_eq!(board.side_to_move(), Color::Black);
//! assert_eq!(board.place(40), Verdict::Legal);
//! assert_eq!(board.place(40), Verdict::Occupied);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use engine_core::{Board, Color, Verdict};
use thiserror::Error;

/// Side length of the standard NoGo board.
pub const STANDARD_SIZE: usize = 9;

/// Largest supported side length.
pub const MAX_SIZE: usize = 25;

/// Errors from constructing or parsing a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board size {width}x{height}, each side must be 1..={max}")]
    InvalidSize {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid cell '{0}', expected one of 'X', 'O', '.'")]
    InvalidCell(char),

    #[error("board diagram is empty")]
    Empty,
}

/// A NoGo position: stones on a rectangular grid plus the side to move.
///
/// Positions are indexed row-major: `index = y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoGoBoard {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
    to_move: Color,
    moves_played: u32,
    scratch: Scratch,
}

/// Flood-fill state reused across legality checks.
///
/// A position counts as visited when its stamp equals `current`, so starting
/// a new fill is a counter bump instead of clearing the buffer.
#[derive(Default)]
struct Marks {
    stamps: Vec<u32>,
    current: u32,
    stack: Vec<usize>,
}

impl Marks {
    /// Start a fill over `len` positions with nothing visited.
    fn begin(&mut self, len: usize) {
        if self.stamps.len() != len {
            self.stamps = vec![0; len];
            self.current = 0;
        }
        self.current = self.current.wrapping_add(1);
        if self.current == 0 {
            self.stamps.fill(0);
            self.current = 1;
        }
        self.stack.clear();
    }

    /// Mark `position`; false if it was already marked in this fill.
    fn visit(&mut self, position: usize) -> bool {
        if self.stamps[position] == self.current {
            false
        } else {
            self.stamps[position] = self.current;
            true
        }
    }
}

/// Scratch space owned by a board but not part of its value: clones start
/// empty and it never affects equality.
#[derive(Default)]
struct Scratch(RefCell<Marks>);

impl Clone for Scratch {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl PartialEq for Scratch {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Scratch {}

impl fmt::Debug for Scratch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scratch")
    }
}

impl NoGoBoard {
    /// Create an empty board with black to move.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 || width > MAX_SIZE || height > MAX_SIZE {
            return Err(BoardError::InvalidSize {
                width,
                height,
                max: MAX_SIZE,
            });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
            to_move: Color::Black,
            moves_played: 0,
            scratch: Scratch::default(),
        })
    }

    /// Empty 9x9 board.
    pub fn standard() -> Self {
        Self {
            width: STANDARD_SIZE,
            height: STANDARD_SIZE,
            cells: vec![None; STANDARD_SIZE * STANDARD_SIZE],
            to_move: Color::Black,
            moves_played: 0,
            scratch: Scratch::default(),
        }
    }

    /// Build a board from a diagram of `X` (black), `O` (white) and `.` rows.
    ///
    /// Rows are separated by newlines or `/`; surrounding whitespace is ignored.
    pub fn from_diagram(diagram: &str, to_move: Color) -> Result<Self, BoardError> {
        let rows: Vec<&str> = diagram
            .split(['\n', '/'])
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        let width = rows.first().map(|row| row.chars().count()).ok_or(BoardError::Empty)?;
        let mut board = Self::new(width, rows.len())?;

        for (y, row) in rows.iter().enumerate() {
            let count = row.chars().count();
            if count != width {
                return Err(BoardError::RaggedRow {
                    row: y,
                    expected: width,
                    actual: count,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    'X' | 'x' => Some(Color::Black),
                    'O' | 'o' => Some(Color::White),
                    '.' => None,
                    other => return Err(BoardError::InvalidCell(other)),
                };
                if cell.is_some() {
                    board.moves_played += 1;
                }
                board.cells[y * width + x] = cell;
            }
        }

        board.to_move = to_move;
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of stones placed so far.
    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    /// Stone at `position`, or `None` if empty or out of range.
    pub fn stone(&self, position: usize) -> Option<Color> {
        self.cells.get(position).copied().flatten()
    }

    /// Row-major index of `(x, y)`.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// `(x, y)` of a row-major index.
    pub fn coords(&self, position: usize) -> (usize, usize) {
        (position % self.width, position / self.width)
    }

    /// The side that has won, if the side to move has no legal placement.
    pub fn winner(&self) -> Option<Color> {
        if engine_core::has_legal_move(self) {
            None
        } else {
            Some(self.to_move.opponent())
        }
    }

    /// Orthogonal neighbours of `position`.
    fn neighbors(&self, position: usize) -> impl Iterator<Item = usize> {
        let (x, y) = self.coords(position);
        let width = self.width;
        let height = self.height;
        [
            (x > 0).then(|| position - 1),
            (x + 1 < width).then(|| position + 1),
            (y > 0).then(|| position - width),
            (y + 1 < height).then(|| position + width),
        ]
        .into_iter()
        .flatten()
    }

    /// Judge a placement of `color` at `position` without modifying the board.
    pub fn check(&self, position: usize, color: Color) -> Verdict {
        if position >= self.cells.len() {
            return Verdict::OutOfRange;
        }
        if self.cells[position].is_some() {
            return Verdict::Occupied;
        }

        let placed = (position, color);
        let mut marks = self.scratch.0.borrow_mut();

        for n in self.neighbors(position) {
            if self.cells[n] == Some(color.opponent()) {
                // A fill may stop early at the first liberty, so marks from a
                // previous group cannot be trusted.
                marks.begin(self.cells.len());
                if !self.group_has_liberty(n, placed, &mut marks) {
                    return Verdict::Capture;
                }
            }
        }

        marks.begin(self.cells.len());
        if !self.group_has_liberty(position, placed, &mut marks) {
            return Verdict::SelfCapture;
        }

        Verdict::Legal
    }

    /// Flood-fill the group containing `start` and report whether any stone
    /// in it touches an empty point, treating `placed` as already on the board.
    fn group_has_liberty(
        &self,
        start: usize,
        placed: (usize, Color),
        marks: &mut Marks,
    ) -> bool {
        let color_at = |p: usize| {
            if p == placed.0 {
                Some(placed.1)
            } else {
                self.cells[p]
            }
        };
        let Some(color) = color_at(start) else {
            return true;
        };

        marks.visit(start);
        marks.stack.push(start);
        while let Some(p) = marks.stack.pop() {
            for n in self.neighbors(p) {
                match color_at(n) {
                    None => return true,
                    Some(c) if c == color => {
                        if marks.visit(n) {
                            marks.stack.push(n);
                        }
                    }
                    _ => {}
                }
            }
        }
        false
    }
}

impl Default for NoGoBoard {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board for NoGoBoard {
    fn num_positions(&self) -> usize {
        self.cells.len()
    }

    fn side_to_move(&self) -> Color {
        self.to_move
    }

    fn place_as(&mut self, position: usize, color: Color) -> Verdict {
        let verdict = self.check(position, color);
        if verdict.is_legal() {
            self.cells[position] = Some(color);
            self.to_move = color.opponent();
            self.moves_played += 1;
        }
        verdict
    }

    fn is_legal(&self, position: usize, color: Color) -> bool {
        self.check(position, color).is_legal()
    }
}

impl fmt::Display for NoGoBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let ch = cell.map(Color::symbol).unwrap_or('.');
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for NoGoBoard {
    type Err = BoardError;

    /// Parse a diagram with the side to move inferred from the stone count
    /// (black moves first).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Self::from_diagram(s, Color::Black)?;
        if board.moves_played % 2 == 1 {
            board.to_move = Color::White;
        }
        Ok(board)
    }
}
