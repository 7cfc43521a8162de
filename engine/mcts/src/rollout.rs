//! Uniform-random playouts.

use engine_core::{Board, Color};
use rand::seq::SliceRandom;
use rand::Rng;

/// Random playout policy with a reusable position buffer.
///
/// Each ply shuffles the buffer and plays the first position that is legal
/// for the side to move, which is a uniform draw over the legal moves. The
/// playout ends as soon as the side to move has no legal placement.
#[derive(Debug, Default, Clone)]
pub struct Rollout {
    order: Vec<usize>,
}

impl Rollout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play random moves on `board` until the side to move is stuck and
    /// return the winner (the other side).
    pub fn simulate<B, R>(&mut self, board: &mut B, rng: &mut R) -> Color
    where
        B: Board,
        R: Rng + ?Sized,
    {
        let n = board.num_positions();
        if self.order.len() != n {
            self.order = (0..n).collect();
        }

        loop {
            let to_move = board.side_to_move();
            self.order.shuffle(rng);

            let Some(&pos) = self.order.iter().find(|&&pos| board.is_legal(pos, to_move)) else {
                return to_move.opponent();
            };
            board.place_as(pos, to_move);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{has_legal_move, Verdict};
    use games_nogo::NoGoBoard;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Every empty cell is legal.
    #[derive(Debug, Clone)]
    struct Cells {
        cells: Vec<Option<Color>>,
        to_move: Color,
    }

    impl Cells {
        fn empty(n: usize) -> Self {
            Self {
                cells: vec![None; n],
                to_move: Color::Black,
            }
        }
    }

    impl Board for Cells {
        fn num_positions(&self) -> usize {
            self.cells.len()
        }

        fn side_to_move(&self) -> Color {
            self.to_move
        }

        fn place_as(&mut self, position: usize, color: Color) -> Verdict {
            match self.cells.get(position) {
                None => Verdict::OutOfRange,
                Some(Some(_)) => Verdict::Occupied,
                Some(None) => {
                    self.cells[position] = Some(color);
                    self.to_move = color.opponent();
                    Verdict::Legal
                }
            }
        }
    }

    #[test]
    fn test_fill_game_winner_follows_parity() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut rollout = Rollout::new();

        for n in 1..6 {
            let mut board = Cells::empty(n);
            let winner = rollout.simulate(&mut board, &mut rng);

            // Odd cell counts leave white stuck
            let expected = if n % 2 == 1 { Color::Black } else { Color::White };
            assert_eq!(winner, expected, "{n} cells");
            assert!(board.cells.iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_nogo_playout_ends_when_side_to_move_is_stuck() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut rollout = Rollout::new();

        for _ in 0..10 {
            let mut board = NoGoBoard::new(5, 5).unwrap();
            let winner = rollout.simulate(&mut board, &mut rng);

            assert!(!has_legal_move(&board));
            assert_eq!(winner, board.side_to_move().opponent());
            assert_eq!(board.winner(), Some(winner));
        }
    }

    #[test]
    fn test_stuck_position_returns_immediately() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut board = NoGoBoard::new(1, 1).unwrap();

        let winner = Rollout::new().simulate(&mut board, &mut rng);
        assert_eq!(winner, Color::White);
        assert_eq!(board.moves_played(), 0);
    }

    #[test]
    fn test_same_seed_same_playout() {
        let play = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut board = NoGoBoard::standard();
            Rollout::new().simulate(&mut board, &mut rng);
            board
        };

        assert_eq!(play(11), play(11));
    }
}
