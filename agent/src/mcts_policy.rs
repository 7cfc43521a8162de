//! MCTS-based move selection
//!
//! Wraps a fresh [`mcts::MctsSearch`] per decision. The search tree is thrown
//! away after each move; only the agent's random stream carries over.

use engine_core::{Board, Color, Place};
use mcts::{run_mcts, MctsConfig, SearchResult};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::AgentConfig;
use crate::policy::{agent_rng, AgentError, MoveSelector};

/// Agent that picks moves with UCT search and random rollouts.
#[derive(Debug)]
pub struct MctsPlayer {
    name: String,
    role: Color,
    config: MctsConfig,
    rng: ChaCha20Rng,
    last_search: Option<SearchResult>,
}

impl MctsPlayer {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            role: config.role,
            config: config.to_mcts_config(),
            rng: agent_rng(config.seed),
            last_search: None,
        }
    }

    /// Create with a specific seed for determinism (used in tests)
    pub fn with_seed(role: Color, seed: u64) -> Self {
        Self {
            name: "mcts".to_string(),
            role,
            config: MctsConfig::default(),
            rng: agent_rng(Some(seed)),
            last_search: None,
        }
    }

    /// Set the MCTS configuration
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    /// Statistics of the most recent search.
    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }
}

impl<B: Board> MoveSelector<B> for MctsPlayer {
    fn select_move(&mut self, board: &B) -> Result<Option<Place>, AgentError> {
        let result = run_mcts(board, self.role, self.config.clone(), &mut self.rng)?;

        debug!(
            agent = %self.name,
            role = %self.role,
            simulations = result.simulations,
            value = result.value,
            action = ?result.action.map(|mv| mv.position()),
            "MCTS selected move"
        );

        let action = result.action;
        self.last_search = Some(result);
        Ok(action)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> Color {
        self.role
    }
}
