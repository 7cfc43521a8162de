//! MCTS tree node representation.
//!
//! Each node represents the position reached by playing `mv` from the
//! parent's position. Nodes store the visit/win statistics used for UCT
//! selection and for picking the final move.

use engine_core::{Color, Place};

use crate::config::UctFormula;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Placement that led here from the parent (None for root)
    pub mv: Option<Place>,

    /// Color that played `mv`
    pub mover: Color,

    /// Number of iterations that passed through this node
    pub visits: u32,

    /// Number of those iterations recorded as wins. Never exceeds `visits`.
    pub wins: u32,

    /// Children in expansion order. Empty until the node is expanded.
    pub children: Vec<NodeId>,
}

impl MctsNode {
    /// Create a new root node. The root's mover is the player who moved
    /// last, i.e. the opponent of the side to move.
    pub fn new_root(mover: Color) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            mover,
            visits: 0,
            wins: 0,
            children: Vec::new(),
        }
    }

    /// Create a new child node for `mv`.
    pub fn new_child(parent: NodeId, mv: Place) -> Self {
        Self {
            parent,
            mv: Some(mv),
            mover: mv.color(),
            visits: 0,
            wins: 0,
            children: Vec::new(),
        }
    }

    /// Check if this is a frontier node (no children yet).
    #[inline]
    pub fn is_frontier(&self) -> bool {
        self.children.is_empty()
    }

    /// Observed win rate. Returns 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }

    /// UCT score for choosing this node from `parent`.
    ///
    /// `wins/visits + c * sqrt(ln(N) / visits)` where `N` is the parent's win
    /// count or visit count depending on `formula`. Unvisited nodes score
    /// `+inf` so every sibling is tried once before any is revisited.
    ///
    /// `N` is clamped to at least 1: with `ParentWins` a parent that has
    /// never won would otherwise produce `ln(0)` and a NaN score.
    #[inline]
    pub fn selection_score(&self, parent: &MctsNode, exploration: f64, formula: UctFormula) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }

        let n = match formula {
            UctFormula::ParentWins => parent.wins,
            UctFormula::Classic => parent.visits,
        }
        .max(1);

        let visits = self.visits as f64;
        self.wins as f64 / visits + exploration * ((n as f64).ln() / visits).sqrt()
    }

    /// Record one iteration through this node.
    #[inline]
    pub fn record(&mut self, won: bool) {
        self.visits += 1;
        if won {
            self.wins += 1;
        }
    }
}
