//! NoGo agents and the match runner behind `nogo-arena`.
//!
//! An agent is described by an [`AgentConfig`] (argument string or TOML),
//! turned into a [`MoveSelector`] with [`build_selector`], and seated in a
//! game with [`play_match`].

pub mod arena;
pub mod config;
pub mod mcts_policy;
pub mod policy;

pub use arena::{build_selector, play_match, MatchRecord};
pub use config::{
    apply_env_overrides, AgentConfig, ConfigError, MatchConfig, PlayerKind, SearchSettings,
};
pub use mcts_policy::MctsPlayer;
pub use policy::{AgentError, MoveSelector, RandomPlayer};
