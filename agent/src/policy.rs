//! Move selection policies for the agent

use engine_core::{Board, Color, Place, Verdict};
use mcts::SearchError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::config::AgentConfig;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("{name} plays {role} but was seated as {seat}")]
    WrongSeat {
        name: String,
        role: Color,
        seat: Color,
    },

    #[error("{name} chose {mv}, which is {verdict}")]
    IllegalMove {
        name: String,
        mv: Place,
        verdict: Verdict,
    },
}

/// Anything that can choose a placement for its role.
pub trait MoveSelector<B: Board> {
    /// Pick a placement for [`MoveSelector::role`] on `board`.
    ///
    /// Returns `Ok(None)` when the role has no legal placement, which means
    /// it has lost.
    fn select_move(&mut self, board: &B) -> Result<Option<Place>, AgentError>;

    fn name(&self) -> &str;

    fn role(&self) -> Color;
}

/// Per-agent random stream: seeded when configured, otherwise from entropy.
pub(crate) fn agent_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}

/// Random policy that places uniformly among the legal positions.
#[derive(Debug)]
pub struct RandomPlayer {
    name: String,
    role: Color,
    rng: ChaCha20Rng,
    space: Vec<usize>,
}

impl RandomPlayer {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            role: config.role,
            rng: agent_rng(config.seed),
            space: Vec::new(),
        }
    }

    pub fn with_seed(role: Color, seed: u64) -> Self {
        Self {
            name: "random".to_string(),
            role,
            rng: ChaCha20Rng::seed_from_u64(seed),
            space: Vec::new(),
        }
    }
}

impl<B: Board> MoveSelector<B> for RandomPlayer {
    fn select_move(&mut self, board: &B) -> Result<Option<Place>, AgentError> {
        let actual = board.side_to_move();
        if actual != self.role {
            return Err(SearchError::NotToMove {
                expected: self.role,
                actual,
            }
            .into());
        }

        let n = board.num_positions();
        if self.space.len() != n {
            self.space = (0..n).collect();
        }
        self.space.shuffle(&mut self.rng);

        let role = self.role;
        Ok(self
            .space
            .iter()
            .find(|&&pos| board.is_legal(pos, role))
            .map(|&pos| Place::new(pos, role)))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Color {
        self.role
    }
}
