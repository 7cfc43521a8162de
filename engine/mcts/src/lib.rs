//! UCT Monte Carlo Tree Search with uniform-random rollouts.
//!
//! This crate searches any position implementing the `engine-core` [`Board`]
//! trait and picks a placement for the side to move.
//!
//! # Overview
//!
//! Each iteration of the search runs four phases on a fresh copy of the
//! caller's board:
//!
//! 1. **Selection**: From the root, repeatedly pick the child with the best
//!    UCT score until a frontier node is reached
//! 2. **Expansion**: On a node's first visit, add a child for every legal
//!    placement, in shuffled order
//! 3. **Simulation**: Play uniformly random legal moves until the side to move
//!    has none; that side loses
//! 4. **Backpropagation**: Add one visit, and a win if the agent won, to every
//!    node from the frontier node up to the root
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Board, Color};
//! use games_nogo::NoGoBoard;
//! use mcts::{run_mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let board = NoGoBoard::new(5, 5).unwrap();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = run_mcts(&board, Color::Black, MctsConfig::for_testing(), &mut rng).unwrap();
//! let mv = result.action.expect("an empty board has legal moves");
//! assert!(board.is_legal(mv.position(), Color::Black));
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `budget`: iterations per decision (default 100) or a wall-clock limit
//! - `exploration`: UCT constant `c` (default sqrt(2))
//! - `uct_formula`: parent wins (default) or parent visits in the log term
//! - `final_selection`: most visited child (default) or best win rate
//! - `backup`: record wins for the agent (default) or for each node's mover
//!
//! [`Board`]: engine_core::Board

pub mod config;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{
    Backup, FinalSelection, MctsConfig, ParseOptionError, SearchBudget, UctFormula,
    DEFAULT_SIMULATIONS,
};
pub use node::{MctsNode, NodeId};
pub use rollout::Rollout;
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult};
pub use tree::{ChildStats, MctsTree, TreeStats};
