//! Shared helpers for enumerating legal placements.
//!
//! These operate purely through the [`Board`] trait so that the search engine,
//! the random baseline player, and the game crates all agree on what "legal
//! move" means.

use crate::action::Place;
use crate::typed::Board;

/// All legal placements for the side to move, in position order.
pub fn legal_moves<B: Board>(board: &B) -> Vec<Place> {
    let color = board.side_to_move();
    (0..board.num_positions())
        .filter(|&pos| board.is_legal(pos, color))
        .map(|pos| Place::new(pos, color))
        .collect()
}

/// Number of legal placements for the side to move.
///
/// A count of zero means the side to move has lost.
pub fn legal_move_count<B: Board>(board: &B) -> usize {
    let color = board.side_to_move();
    (0..board.num_positions())
        .filter(|&pos| board.is_legal(pos, color))
        .count()
}

/// Whether the side to move has at least one legal placement.
///
/// Stops at the first legal position, so it is cheaper than
/// `legal_move_count(board) > 0` on open boards.
pub fn has_legal_move<B: Board>(board: &B) -> bool {
    let color = board.side_to_move();
    (0..board.num_positions()).any(|pos| board.is_legal(pos, color))
}
