//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse the tree using UCT until a frontier node
//! 2. Expansion: On a node's first visit, add a child per legal placement
//! 3. Simulation: Play random moves until the side to move is stuck
//! 4. Backpropagation: Update visits and wins along the path to the root

use std::time::Instant;

use engine_core::{Board, Color, Place};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{MctsConfig, SearchBudget};
use crate::node::NodeId;
use crate::rollout::Rollout;
use crate::tree::{ChildStats, MctsTree};

/// Errors that can occur during MCTS search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("searching for {expected} but {actual} is to move")]
    NotToMove { expected: Color, actual: Color },
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Move to play, or None when the agent has no legal placement
    pub action: Option<Place>,

    /// Number of iterations performed
    pub simulations: u32,

    /// Root win rate from the agent's point of view
    pub value: f64,

    /// Statistics of the root's children, in expansion order
    pub children: Vec<ChildStats>,
}

/// MCTS search state.
///
/// The tree lives only as long as the search; the caller's board is never
/// modified.
pub struct MctsSearch<'a, B: Board> {
    tree: MctsTree,
    board: &'a B,
    config: MctsConfig,
    agent: Color,
    rollout: Rollout,
    candidates: Vec<usize>,
}

impl<'a, B: Board> MctsSearch<'a, B> {
    /// Create a new search choosing a move for `agent` on `board`.
    pub fn new(board: &'a B, agent: Color, config: MctsConfig) -> Result<Self, SearchError> {
        let actual = board.side_to_move();
        if actual != agent {
            return Err(SearchError::NotToMove {
                expected: agent,
                actual,
            });
        }

        Ok(Self {
            tree: MctsTree::new(agent.opponent()),
            board,
            config,
            agent,
            rollout: Rollout::new(),
            candidates: (0..board.num_positions()).collect(),
        })
    }

    /// Run the search until the configured budget is spent.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> SearchResult {
        let mut iterations = 0u32;

        match self.config.budget {
            SearchBudget::Iterations(n) => {
                for _ in 0..n {
                    self.iterate(rng);
                }
                iterations = n;
            }
            SearchBudget::Time(limit) => {
                let start = Instant::now();
                while start.elapsed() < limit {
                    self.iterate(rng);
                    iterations += 1;
                }
            }
        }

        let action = self
            .tree
            .best_child(self.config.final_selection)
            .and_then(|id| self.tree.get(id).mv);
        let root = self.tree.get(self.tree.root());
        let result = SearchResult {
            action,
            simulations: iterations,
            value: root.win_rate(),
            children: self.tree.root_children(),
        };

        let stats = self.tree.stats();
        debug!(
            agent = %self.agent,
            iterations,
            value = result.value,
            nodes = stats.total_nodes,
            depth = stats.max_depth,
            action = ?result.action.map(|mv| mv.position()),
            "MCTS search complete"
        );

        result
    }

    /// Run one select -> expand -> simulate -> backpropagate iteration.
    fn iterate(&mut self, rng: &mut ChaCha20Rng) {
        let mut board = self.board.clone();

        let (leaf_id, depth) = self.select(&mut board);

        if self.tree.get(leaf_id).visits == 0 {
            self.expand(leaf_id, &board, rng);
        }

        let winner = self.rollout.simulate(&mut board, rng);
        self.tree
            .backpropagate(leaf_id, winner, self.agent, self.config.backup);

        trace!(
            leaf = leaf_id.0,
            depth,
            agent_won = winner == self.agent,
            "MCTS iteration complete"
        );
    }

    /// Descend to a frontier node, playing each chosen move on `board`.
    fn select(&self, board: &mut B) -> (NodeId, u32) {
        let mut current = self.tree.root();
        let mut depth = 0;

        while !self.tree.get(current).is_frontier() {
            let Some(child_id) =
                self.tree
                    .select_child(current, self.config.exploration, self.config.uct_formula)
            else {
                break;
            };
            if let Some(mv) = self.tree.get(child_id).mv {
                mv.apply(board);
            }
            current = child_id;
            depth += 1;
        }

        (current, depth)
    }

    /// Add a child for every legal placement of the side to move, in
    /// shuffled order. Nodes without legal placements stay childless.
    fn expand(&mut self, node_id: NodeId, board: &B, rng: &mut ChaCha20Rng) {
        let color = board.side_to_move();
        self.candidates.shuffle(rng);

        for &pos in &self.candidates {
            if board.is_legal(pos, color) {
                self.tree.add_child(node_id, Place::new(pos, color));
            }
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Convenience function to run a search and return the result.
pub fn run_mcts<B: Board>(
    board: &B,
    agent: Color,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(board, agent, config)?;
    Ok(search.run(rng))
}
