//! MCTS configuration parameters.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Default number of search iterations per decision.
pub const DEFAULT_SIMULATIONS: u32 = 100;

/// How much work one decision may spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBudget {
    /// Run exactly this many select/expand/simulate/backpropagate iterations.
    Iterations(u32),
    /// Keep iterating until this much wall-clock time has elapsed.
    Time(Duration),
}

/// Which count feeds the logarithm of the UCT exploration term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UctFormula {
    /// `ln(parent.wins)`. This is the tuning the agent has always shipped with.
    #[default]
    ParentWins,
    /// Textbook UCT: `ln(parent.visits)`.
    Classic,
}

/// How the move is picked from the root once the budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalSelection {
    /// Child with the most visits (robust child).
    #[default]
    MostVisits,
    /// Child with the highest `wins / visits`.
    BestWinRate,
}

/// Whose point of view a rollout result is recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backup {
    /// Every node counts a win when the searching agent won the rollout.
    #[default]
    AgentPerspective,
    /// A node counts a win when the player who made its move won the rollout.
    MoverPerspective,
}

/// Error for unrecognised option names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for UctFormula {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parent_wins" | "reference" | "wins" => Ok(UctFormula::ParentWins),
            "classic" | "visits" => Ok(UctFormula::Classic),
            _ => Err(ParseOptionError {
                kind: "uct formula",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for FinalSelection {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "most_visits" | "visits" | "robust" => Ok(FinalSelection::MostVisits),
            "best_win_rate" | "win_rate" | "max" => Ok(FinalSelection::BestWinRate),
            _ => Err(ParseOptionError {
                kind: "final selection",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Backup {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agent" | "agent_perspective" => Ok(Backup::AgentPerspective),
            "mover" | "mover_perspective" => Ok(Backup::MoverPerspective),
            _ => Err(ParseOptionError {
                kind: "backup perspective",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for UctFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UctFormula::ParentWins => "parent_wins",
            UctFormula::Classic => "classic",
        })
    }
}

impl fmt::Display for FinalSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FinalSelection::MostVisits => "most_visits",
            FinalSelection::BestWinRate => "best_win_rate",
        })
    }
}

impl fmt::Display for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backup::AgentPerspective => "agent",
            Backup::MoverPerspective => "mover",
        })
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Iteration count or wall-clock limit per decision.
    pub budget: SearchBudget,

    /// Exploration constant `c` in the UCT formula. Defaults to sqrt(2).
    pub exploration: f64,

    /// Count used inside the exploration logarithm.
    pub uct_formula: UctFormula,

    /// Rule for choosing the move after search.
    pub final_selection: FinalSelection,

    /// Perspective used when recording rollout results.
    pub backup: Backup,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::Iterations(DEFAULT_SIMULATIONS),
            exploration: std::f64::consts::SQRT_2,
            uct_formula: UctFormula::default(),
            final_selection: FinalSelection::default(),
            backup: Backup::default(),
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            budget: SearchBudget::Iterations(50),
            ..Self::default()
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.budget = SearchBudget::Iterations(n);
        self
    }

    /// Builder pattern: search for a fixed amount of time instead.
    pub fn with_time_budget(mut self, limit: Duration) -> Self {
        self.budget = SearchBudget::Time(limit);
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_uct_formula(mut self, formula: UctFormula) -> Self {
        self.uct_formula = formula;
        self
    }

    pub fn with_final_selection(mut self, selection: FinalSelection) -> Self {
        self.final_selection = selection;
        self
    }

    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = backup;
        self
    }
}
