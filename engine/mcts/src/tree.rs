//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Dropping the tree frees every node.

use engine_core::{Color, Place};

use crate::config::{Backup, FinalSelection, UctFormula};
use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree whose root was reached by a move of `root_mover`.
    pub fn new(root_mover: Color) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_mover)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCT score.
    ///
    /// Ties go to the first maximal child in stored order.
    pub fn select_child(
        &self,
        node_id: NodeId,
        exploration: f64,
        formula: UctFormula,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        let mut best: Option<(NodeId, f64)> = None;

        for &child_id in &node.children {
            let score = self.get(child_id).selection_score(node, exploration, formula);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }

        best.map(|(id, _)| id)
    }

    /// Add a child for `mv` under `parent_id`.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, mv: Place) -> NodeId {
        let child_id = self.allocate(MctsNode::new_child(parent_id, mv));
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Record a rollout result on `leaf_id` and every ancestor up to the root.
    ///
    /// With [`Backup::AgentPerspective`] every node counts a win when
    /// `winner == agent`; with [`Backup::MoverPerspective`] a node counts a win
    /// when `winner` is the color that made its move.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Color, agent: Color, backup: Backup) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            let won = match backup {
                Backup::AgentPerspective => winner == agent,
                Backup::MoverPerspective => winner == node.mover,
            };
            node.record(won);
            current_id = node.parent;
        }
    }

    /// Pick the root child to play.
    /// Returns None if the root has no children. Ties go to the first child.
    pub fn best_child(&self, selection: FinalSelection) -> Option<NodeId> {
        let root = self.get(self.root);
        let mut best: Option<NodeId> = None;

        for &child_id in &root.children {
            let child = self.get(child_id);
            let better = match best.map(|id| self.get(id)) {
                None => true,
                Some(current) => match selection {
                    FinalSelection::MostVisits => child.visits > current.visits,
                    FinalSelection::BestWinRate => child.win_rate() > current.win_rate(),
                },
            };
            if better {
                best = Some(child_id);
            }
        }

        best
    }

    /// Per-child statistics of the root, in expansion order.
    pub fn root_children(&self) -> Vec<ChildStats> {
        self.get(self.root)
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.mv.map(|mv| ChildStats {
                    mv,
                    visits: child.visits,
                    wins: child.wins,
                })
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_win_rate: root.win_rate(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];

        while let Some((node_id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in &self.get(node_id).children {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }
}

/// Visit statistics of one root child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildStats {
    pub mv: Place,
    pub visits: u32,
    pub wins: u32,
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_win_rate: f64,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: f64 = std::f64::consts::SQRT_2;

    fn place(pos: usize) -> Place {
        Place::new(pos, Color::Black)
    }

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new(Color::White);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.mover, Color::White);
    }

    #[test]
    fn test_add_child() {
        let mut tree = MctsTree::new(Color::White);

        let child_id = tree.add_child(tree.root(), place(4));

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![NodeId(1)]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.mv, Some(place(4)));
        assert_eq!(child.mover, Color::Black);
    }

    #[test]
    fn test_backpropagate_agent_perspective() {
        let mut tree = MctsTree::new(Color::White);

        // Create a chain: root -> child -> grandchild
        let child = tree.add_child(tree.root(), place(0));
        let grandchild = tree.add_child(child, Place::new(1, Color::White));

        tree.backpropagate(grandchild, Color::Black, Color::Black, Backup::AgentPerspective);
        tree.backpropagate(grandchild, Color::White, Color::Black, Backup::AgentPerspective);

        // Same flag at every level, no alternation
        for id in [grandchild, child, tree.root()] {
            assert_eq!(tree.get(id).visits, 2);
            assert_eq!(tree.get(id).wins, 1);
        }
    }

    #[test]
    fn test_backpropagate_mover_perspective() {
        let mut tree = MctsTree::new(Color::White);
        let child = tree.add_child(tree.root(), place(0));
        let grandchild = tree.add_child(child, Place::new(1, Color::White));

        tree.backpropagate(grandchild, Color::Black, Color::Black, Backup::MoverPerspective);

        // Credit alternates with the mover of each node
        assert_eq!(tree.get(grandchild).wins, 0);
        assert_eq!(tree.get(child).wins, 1);
        assert_eq!(tree.get(tree.root()).wins, 0);
        assert_eq!(tree.get(tree.root()).visits, 1);
    }

    #[test]
    fn test_select_child_prefers_unvisited_in_order() {
        let mut tree = MctsTree::new(Color::White);
        let a = tree.add_child(tree.root(), place(0));
        let b = tree.add_child(tree.root(), place(1));
        let c = tree.add_child(tree.root(), place(2));

        // All unvisited: first child wins the tie
        assert_eq!(tree.select_child(tree.root(), C, UctFormula::Classic), Some(a));

        tree.get_mut(a).visits = 1;
        assert_eq!(tree.select_child(tree.root(), C, UctFormula::Classic), Some(b));

        tree.get_mut(b).visits = 1;
        assert_eq!(tree.select_child(tree.root(), C, UctFormula::Classic), Some(c));
    }

    #[test]
    fn test_select_child_balances_exploitation() {
        let mut tree = MctsTree::new(Color::White);
        let a = tree.add_child(tree.root(), place(0));
        let b = tree.add_child(tree.root(), place(1));

        tree.get_mut(tree.root()).visits = 20;
        tree.get_mut(tree.root()).wins = 10;
        tree.get_mut(a).visits = 10;
        tree.get_mut(a).wins = 2;
        tree.get_mut(b).visits = 10;
        tree.get_mut(b).wins = 8;

        assert_eq!(tree.select_child(tree.root(), C, UctFormula::ParentWins), Some(b));
        assert_eq!(tree.select_child(tree.root(), C, UctFormula::Classic), Some(b));
    }

    #[test]
    fn test_select_child_of_frontier() {
        let tree = MctsTree::new(Color::White);
        assert_eq!(tree.select_child(tree.root(), C, UctFormula::Classic), None);
    }

    #[test]
    fn test_best_child() {
        let mut tree = MctsTree::new(Color::White);
        assert_eq!(tree.best_child(FinalSelection::MostVisits), None);

        let a = tree.add_child(tree.root(), place(0));
        let b = tree.add_child(tree.root(), place(1));
        let c = tree.add_child(tree.root(), place(2));

        tree.get_mut(a).visits = 30;
        tree.get_mut(a).wins = 10;
        tree.get_mut(b).visits = 5;
        tree.get_mut(b).wins = 4;
        tree.get_mut(c).visits = 30;
        tree.get_mut(c).wins = 25;

        // a and c tie on visits: first one wins
        assert_eq!(tree.best_child(FinalSelection::MostVisits), Some(a));
        assert_eq!(tree.best_child(FinalSelection::BestWinRate), Some(c));
    }

    #[test]
    fn test_best_child_without_visits_is_first() {
        let mut tree = MctsTree::new(Color::White);
        let a = tree.add_child(tree.root(), place(5));
        tree.add_child(tree.root(), place(6));

        assert_eq!(tree.best_child(FinalSelection::MostVisits), Some(a));
        assert_eq!(tree.best_child(FinalSelection::BestWinRate), Some(a));
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MctsTree::new(Color::White);
        let child = tree.add_child(tree.root(), place(0));
        tree.add_child(child, Place::new(1, Color::White));
        tree.add_child(tree.root(), place(2));

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(tree.root_children().len(), 2);
    }
}
