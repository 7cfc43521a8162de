//! Agent configuration
//!
//! Agents are configured from a whitespace-separated `key=value` string such
//! as `name=mcts role=black seed=7 T=200`, or from a TOML file with the same
//! fields. Environment variables (`NOGO_AGENT_*`) override the search
//! settings of every agent. Everything is validated once, up front: an agent
//! with an invalid role or name is never constructed.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use engine_core::Color;
use mcts::{Backup, FinalSelection, MctsConfig, ParseOptionError, UctFormula, DEFAULT_SIMULATIONS};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Characters that may not appear in an agent name.
pub const RESERVED_NAME_CHARS: &[char] = &['[', ']', '(', ')', ':', ';', ' '];

/// Name used when none is configured.
pub const DEFAULT_NAME: &str = "unknown";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing role, expected role=black or role=white")]
    MissingRole,

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("malformed option '{0}', expected key=value")]
    MalformedPair(String),

    #[error("invalid value '{value}' for '{key}'")]
    InvalidNumber { key: String, value: String },

    #[error(transparent)]
    UnknownOption(#[from] ParseOptionError),

    #[error("time budget must be greater than 0")]
    ZeroTimeBudget,

    #[error("exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),

    #[error("section [{section}] has role {role}")]
    RoleMismatch { section: Color, role: Color },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Which move selector an agent runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Mcts,
    Random,
}

impl FromStr for PlayerKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcts" | "uct" => Ok(PlayerKind::Mcts),
            "random" => Ok(PlayerKind::Random),
            _ => Err(ParseOptionError {
                kind: "player",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerKind::Mcts => "mcts",
            PlayerKind::Random => "random",
        })
    }
}

/// Search parameters of an MCTS agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    /// Iterations per decision (`T=` in an argument string)
    pub simulations: u32,

    /// Wall-clock budget per decision; replaces `simulations` when set
    pub time_ms: Option<u64>,

    /// UCT exploration constant (`c=`)
    pub exploration: f64,

    pub uct: UctFormula,

    #[serde(rename = "final")]
    pub final_selection: FinalSelection,

    pub backup: Backup,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            time_ms: None,
            exploration: std::f64::consts::SQRT_2,
            uct: UctFormula::default(),
            final_selection: FinalSelection::default(),
            backup: Backup::default(),
        }
    }
}

impl SearchSettings {
    /// Apply one `key=value` search option. Returns `false` for keys that
    /// are not search options.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        match key {
            "T" | "simulations" => self.simulations = parse_number(key, value)?,
            "time_ms" => self.time_ms = Some(parse_number(key, value)?),
            "c" | "exploration" => self.exploration = parse_number(key, value)?,
            "uct" => self.uct = value.parse()?,
            "final" => self.final_selection = value.parse()?,
            "backup" => self.backup = value.parse()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn to_mcts_config(&self) -> MctsConfig {
        let config = MctsConfig::default()
            .with_exploration(self.exploration)
            .with_uct_formula(self.uct)
            .with_final_selection(self.final_selection)
            .with_backup(self.backup);

        match self.time_ms {
            Some(ms) => config.with_time_budget(Duration::from_millis(ms)),
            None => config.with_simulations(self.simulations),
        }
    }
}

/// Validated configuration of one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub role: Color,
    pub seed: Option<u64>,
    pub player: PlayerKind,
    pub search: SearchSettings,
    /// Options this crate does not interpret, kept for callers that do
    pub properties: BTreeMap<String, String>,
}

impl AgentConfig {
    /// Parse an argument string such as `name=mcts role=black seed=7 T=200`.
    ///
    /// Recognised keys: `name`, `role`, `seed`, `player`, `T` (or
    /// `simulations`), `time_ms`, `c` (or `exploration`), `uct`, `final`,
    /// `backup`. Any other key is stored in [`AgentConfig::properties`].
    pub fn from_args(args: &str) -> Result<Self, ConfigError> {
        let mut raw = RawAgent::default();
        for pair in args.split_whitespace() {
            let (key, value) = split_pair(pair)?;
            raw.set(key, value)?;
        }
        raw.into_config(None)
    }

    /// Parse a single agent from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawAgent = toml::from_str(content)?;
        raw.into_config(None)
    }

    /// Load a single agent from a TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path)?;
        let raw: RawAgent = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        raw.into_config(None)
    }

    /// Look up an uninterpreted option.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Update the agent from a `key=value` message.
    ///
    /// Known keys change the typed fields, anything else lands in
    /// [`AgentConfig::properties`]. The agent is left unchanged when the
    /// message is malformed or the result fails validation.
    pub fn notify(&mut self, msg: &str) -> Result<(), ConfigError> {
        let (key, value) = split_pair(msg)?;
        let mut next = self.clone();

        match key {
            "name" => next.name = value.to_string(),
            "role" => {
                next.role = value
                    .parse::<Color>()
                    .map_err(|_| ConfigError::InvalidRole(value.to_string()))?
            }
            "seed" => next.seed = Some(parse_number(key, value)?),
            "player" => next.player = value.parse()?,
            _ => {
                if !next.search.set(key, value)? {
                    next.properties.insert(key.to_string(), value.to_string());
                }
            }
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() || self.name.contains(RESERVED_NAME_CHARS) {
            return Err(ConfigError::InvalidName(self.name.clone()));
        }

        if self.search.time_ms == Some(0) {
            return Err(ConfigError::ZeroTimeBudget);
        }

        let c = self.search.exploration;
        if !c.is_finite() || c < 0.0 {
            return Err(ConfigError::InvalidExploration(c));
        }

        Ok(())
    }

    pub fn to_mcts_config(&self) -> MctsConfig {
        self.search.to_mcts_config()
    }
}

/// Both seats of a match, as loaded from a TOML file with `[black]` and
/// `[white]` tables. A table without a `role` plays the seat it is named after.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    pub black: AgentConfig,
    pub white: AgentConfig,
}

impl MatchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawMatch = toml::from_str(content)?;
        raw.into_config()
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path)?;
        let raw: RawMatch = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        raw.into_config()
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn split_pair(pair: &str) -> Result<(&str, &str), ConfigError> {
    pair.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ConfigError::MalformedPair(pair.to_string()))
}

/// Unvalidated fields shared by the argument-string and TOML front ends.
///
/// TOML has no catch-all: uninterpreted options go in a `[properties]`
/// table, and any other unknown key is an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAgent {
    name: Option<String>,
    role: Option<String>,
    seed: Option<u64>,
    #[serde(default)]
    player: PlayerKind,
    #[serde(default)]
    search: SearchSettings,
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

impl RawAgent {
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "name" => self.name = Some(value.to_string()),
            "role" => self.role = Some(value.to_string()),
            "seed" => self.seed = Some(parse_number(key, value)?),
            "player" => self.player = value.parse()?,
            _ => {
                if !self.search.set(key, value)? {
                    debug!(key, value, "storing uninterpreted agent option");
                    self.properties.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(())
    }

    fn into_config(self, seat: Option<Color>) -> Result<AgentConfig, ConfigError> {
        let role = match (self.role, seat) {
            (Some(role), _) => role
                .parse::<Color>()
                .map_err(|_| ConfigError::InvalidRole(role))?,
            (None, Some(seat)) => seat,
            (None, None) => return Err(ConfigError::MissingRole),
        };
        if let Some(section) = seat.filter(|&section| section != role) {
            return Err(ConfigError::RoleMismatch { section, role });
        }

        let config = AgentConfig {
            name: self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            role,
            seed: self.seed,
            player: self.player,
            search: self.search,
            properties: self.properties,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMatch {
    black: RawAgent,
    white: RawAgent,
}

impl RawMatch {
    fn into_config(self) -> Result<MatchConfig, ConfigError> {
        Ok(MatchConfig {
            black: self.black.into_config(Some(Color::Black))?,
            white: self.white.into_config(Some(Color::White))?,
        })
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // Parseable field (u32, f64, enums, ...)
    ($config:expr, $($field:ident).+, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$($field).+ = v;
        }
    };
    // Optional parseable field (Option<u64>, ...)
    ($config:expr, $($field:ident).+, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$($field).+ = Some(v);
        }
    };
}

/// Apply environment variable overrides to an agent.
///
/// Environment variables follow the pattern: NOGO_AGENT_<KEY>. Values that
/// fail to parse are ignored. The result is validated again.
pub fn apply_env_overrides(mut config: AgentConfig) -> Result<AgentConfig, ConfigError> {
    env_override!(config, seed, "NOGO_AGENT_SEED", optional_parse);
    env_override!(config, player, "NOGO_AGENT_PLAYER", parse);
    env_override!(config, search.simulations, "NOGO_AGENT_SIMULATIONS", parse);
    env_override!(config, search.time_ms, "NOGO_AGENT_TIME_MS", optional_parse);
    env_override!(config, search.exploration, "NOGO_AGENT_EXPLORATION", parse);
    env_override!(config, search.uct, "NOGO_AGENT_UCT", parse);
    env_override!(config, search.final_selection, "NOGO_AGENT_FINAL", parse);
    env_override!(config, search.backup, "NOGO_AGENT_BACKUP", parse);

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcts::SearchBudget;

    #[test]
    fn from_args_reads_all_fields() {
        let cfg = AgentConfig::from_args(
            "name=mcts role=black seed=7 T=200 uct=classic final=win_rate backup=mover c=0.5",
        )
        .unwrap();

        assert_eq!(cfg.name, "mcts");
        assert_eq!(cfg.role, Color::Black);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.player, PlayerKind::Mcts);
        assert_eq!(cfg.search.simulations, 200);
        assert_eq!(cfg.search.uct, UctFormula::Classic);
        assert_eq!(cfg.search.final_selection, FinalSelection::BestWinRate);
        assert_eq!(cfg.search.backup, Backup::MoverPerspective);
        assert!((cfg.search.exploration - 0.5).abs() < 1e-12);
    }

    #[test]
    fn from_args_defaults() {
        let cfg = AgentConfig::from_args("role=white").unwrap();
        assert_eq!(cfg.name, DEFAULT_NAME);
        assert_eq!(cfg.role, Color::White);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.search, SearchSettings::default());
        assert_eq!(cfg.to_mcts_config().budget, SearchBudget::Iterations(100));
    }

    #[test]
    fn from_args_keeps_unknown_keys() {
        let cfg = AgentConfig::from_args("role=black mcts=1 search=uct").unwrap();
        assert_eq!(cfg.property("mcts"), Some("1"));
        assert_eq!(cfg.property("search"), Some("uct"));
        assert_eq!(cfg.property("role"), None);
    }

    #[test]
    fn from_args_later_keys_win() {
        let cfg = AgentConfig::from_args("role=black T=10 role=white T=20").unwrap();
        assert_eq!(cfg.role, Color::White);
        assert_eq!(cfg.search.simulations, 20);
    }

    #[test]
    fn from_args_rejects_missing_role() {
        let err = AgentConfig::from_args("name=mcts seed=1").unwrap_err();
        assert!(matches!(err, ConfigError::MissingRole));
    }

    #[test]
    fn from_args_rejects_invalid_role() {
        let err = AgentConfig::from_args("role=unknown").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRole(ref r) if r == "unknown"));
        assert!(err.to_string().contains("invalid role"));
    }

    #[test]
    fn from_args_rejects_invalid_name() {
        for name in ["a(b)", "x:y", "semi;colon", "[tag]"] {
            let err = AgentConfig::from_args(&format!("name={name} role=black")).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidName(_)), "{name}");
        }

        let err = AgentConfig::from_args("name= role=black").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName(ref n) if n.is_empty()));
    }

    #[test]
    fn from_args_rejects_malformed_pair() {
        let err = AgentConfig::from_args("role=black verbose").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedPair(ref p) if p == "verbose"));

        let err = AgentConfig::from_args("role=black =5").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedPair(_)));
    }

    #[test]
    fn from_args_rejects_bad_numbers() {
        let err = AgentConfig::from_args("role=black T=lots").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { ref key, .. } if key == "T"));

        let err = AgentConfig::from_args("role=black seed=-1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { ref key, .. } if key == "seed"));
    }

    #[test]
    fn from_args_rejects_unknown_option_names() {
        let err = AgentConfig::from_args("role=black final=greedy").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption(_)));
        assert_eq!(err.to_string(), "unknown final selection 'greedy'");
    }

    #[test]
    fn validate_rejects_zero_time_budget() {
        let err = AgentConfig::from_args("role=black time_ms=0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeBudget));
    }

    #[test]
    fn validate_rejects_negative_exploration() {
        let err = AgentConfig::from_args("role=black c=-1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExploration(_)));
    }

    #[test]
    fn time_budget_replaces_iterations() {
        let cfg = AgentConfig::from_args("role=black T=50 time_ms=250").unwrap();
        assert_eq!(
            cfg.to_mcts_config().budget,
            SearchBudget::Time(Duration::from_millis(250))
        );
    }

    #[test]
    fn from_toml_str_reads_agent() {
        let cfg = AgentConfig::from_toml_str(
            r#"
name = "uct-classic"
role = "white"
seed = 3

[search]
simulations = 400
uct = "classic"
final = "best_win_rate"
"#,
        )
        .unwrap();

        assert_eq!(cfg.name, "uct-classic");
        assert_eq!(cfg.role, Color::White);
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.search.simulations, 400);
        assert_eq!(cfg.search.uct, UctFormula::Classic);
        assert_eq!(cfg.search.final_selection, FinalSelection::BestWinRate);
        assert_eq!(cfg.search.backup, Backup::AgentPerspective);
    }

    #[test]
    fn from_toml_str_validates() {
        let err = AgentConfig::from_toml_str("name = \"two words\"\nrole = \"black\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName(_)));

        let err = AgentConfig::from_toml_str("role = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn match_config_fills_roles_from_sections() {
        let cfg = MatchConfig::from_toml_str(
            r#"
[black]
name = "mcts"
seed = 1

[white]
name = "baseline"
player = "random"
"#,
        )
        .unwrap();

        assert_eq!(cfg.black.role, Color::Black);
        assert_eq!(cfg.white.role, Color::White);
        assert_eq!(cfg.white.player, PlayerKind::Random);
    }

    #[test]
    fn from_toml_str_rejects_unknown_keys() {
        // Search options belong in [search], not at the top level
        for content in [
            "role = \"black\"\nsimulations = 5",
            "role = \"black\"\nT = 7",
            "role = \"black\"\nuct = \"classic\"",
            "role = \"black\"\n[search]\nT = 7",
        ] {
            let err = AgentConfig::from_toml_str(content).unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)), "{content}");
        }

        let err = MatchConfig::from_toml_str("[black]\n[white]\n[green]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn from_toml_str_keeps_properties_table() {
        let cfg = AgentConfig::from_toml_str(
            "role = \"black\"\n[properties]\nmcts = \"1\"\n[search]\nsimulations = 5\n",
        )
        .unwrap();
        assert_eq!(cfg.property("mcts"), Some("1"));
        assert_eq!(cfg.search.simulations, 5);
    }

    #[test]
    fn notify_updates_fields_and_properties() {
        let mut cfg = AgentConfig::from_args("name=mcts role=black").unwrap();

        cfg.notify("T=300").unwrap();
        cfg.notify("uct=classic").unwrap();
        cfg.notify("opponent=random").unwrap();
        cfg.notify("seed=11").unwrap();

        assert_eq!(cfg.search.simulations, 300);
        assert_eq!(cfg.search.uct, UctFormula::Classic);
        assert_eq!(cfg.property("opponent"), Some("random"));
        assert_eq!(cfg.seed, Some(11));

        // A later message replaces an earlier property
        cfg.notify("opponent=mcts").unwrap();
        assert_eq!(cfg.property("opponent"), Some("mcts"));
    }

    #[test]
    fn notify_rejects_bad_messages_without_changes() {
        let mut cfg = AgentConfig::from_args("name=mcts role=black T=50").unwrap();
        let before = cfg.clone();

        assert!(matches!(cfg.notify("verbose"), Err(ConfigError::MalformedPair(_))));
        assert!(matches!(cfg.notify("name=a;b"), Err(ConfigError::InvalidName(_))));
        assert!(matches!(cfg.notify("role=green"), Err(ConfigError::InvalidRole(_))));
        assert!(matches!(cfg.notify("time_ms=0"), Err(ConfigError::ZeroTimeBudget)));
        assert!(matches!(cfg.notify("T=many"), Err(ConfigError::InvalidNumber { .. })));

        assert_eq!(cfg, before);
    }

    #[test]
    fn match_config_rejects_role_mismatch() {
        let err = MatchConfig::from_toml_str("[black]\nrole = \"white\"\n[white]\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RoleMismatch {
                section: Color::Black,
                role: Color::White
            }
        ));
    }

    #[test]
    fn load_from_path_reports_missing_file() {
        let err = AgentConfig::load_from_path(Path::new("/nonexistent/agent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/agent.toml"));
    }

    #[test]
    fn env_overrides_apply_to_search() {
        std::env::set_var("NOGO_AGENT_SIMULATIONS", "33");
        std::env::set_var("NOGO_AGENT_UCT", "classic");
        std::env::set_var("NOGO_AGENT_SEED", "not-a-number");

        let cfg = AgentConfig::from_args("role=black seed=5").unwrap();
        let cfg = apply_env_overrides(cfg).unwrap();

        assert_eq!(cfg.search.simulations, 33);
        assert_eq!(cfg.search.uct, UctFormula::Classic);
        // Unparsable values are ignored
        assert_eq!(cfg.seed, Some(5));

        std::env::remove_var("NOGO_AGENT_SIMULATIONS");
        std::env::remove_var("NOGO_AGENT_UCT");
        std::env::remove_var("NOGO_AGENT_SEED");
    }
}
