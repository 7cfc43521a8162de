//! Head-to-head games between two move selectors.

use engine_core::{Board, Color, Place};
use tracing::{debug, trace};

use crate::config::{AgentConfig, PlayerKind};
use crate::mcts_policy::MctsPlayer;
use crate::policy::{AgentError, MoveSelector, RandomPlayer};

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Side that still had a legal placement when the game ended
    pub winner: Color,
    /// Every placement, in order
    pub moves: Vec<Place>,
}

/// Build the selector described by `config`.
pub fn build_selector<B: Board + 'static>(config: &AgentConfig) -> Box<dyn MoveSelector<B>> {
    match config.player {
        PlayerKind::Mcts => Box::new(MctsPlayer::new(config)),
        PlayerKind::Random => Box::new(RandomPlayer::new(config)),
    }
}

/// Play one game from `board` until the side to move has no placement.
///
/// The selectors must be seated by role. A selector that returns an illegal
/// placement forfeits with an error rather than a result.
pub fn play_match<B: Board>(
    black: &mut dyn MoveSelector<B>,
    white: &mut dyn MoveSelector<B>,
    mut board: B,
) -> Result<MatchRecord, AgentError> {
    for (selector, seat) in [(&*black, Color::Black), (&*white, Color::White)] {
        if selector.role() != seat {
            return Err(AgentError::WrongSeat {
                name: selector.name().to_string(),
                role: selector.role(),
                seat,
            });
        }
    }

    let mut moves = Vec::new();
    loop {
        let to_move = board.side_to_move();
        let selector: &mut dyn MoveSelector<B> = match to_move {
            Color::Black => &mut *black,
            Color::White => &mut *white,
        };

        let Some(mv) = selector.select_move(&board)? else {
            let winner = to_move.opponent();
            debug!(%winner, moves = moves.len(), "game over");
            return Ok(MatchRecord { winner, moves });
        };

        let verdict = mv.apply(&mut board);
        if !verdict.is_legal() {
            return Err(AgentError::IllegalMove {
                name: selector.name().to_string(),
                mv,
                verdict,
            });
        }

        trace!(ply = moves.len(), %mv, "move played");
        moves.push(mv);
    }
}
