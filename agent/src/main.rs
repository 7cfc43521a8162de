//! nogo-arena - plays NoGo games between two configured agents
//!
//! Agents come from argument strings (`--black`, `--white`) or from a match
//! file (`--config`) with `[black]` and `[white]` tables. `NOGO_AGENT_*`
//! environment variables override the search settings of both agents.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_core::Color;
use games_nogo::NoGoBoard;
use nogo_agent::{apply_env_overrides, build_selector, play_match, AgentConfig, MatchConfig};
use tracing::info;
use tracing::level_filters::LevelFilter;

fn default_log_level() -> String {
    std::env::var("NOGO_ARENA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

#[derive(Parser, Debug, Clone)]
#[command(name = "nogo-arena")]
#[command(about = "Play NoGo games between two agents")]
struct Cli {
    /// Black agent, e.g. "name=mcts role=black seed=7 T=200"
    #[arg(long, default_value = "name=mcts role=black")]
    black: String,

    /// White agent, e.g. "name=baseline role=white player=random"
    #[arg(long, default_value = "name=random role=white player=random")]
    white: String,

    /// Match file with [black] and [white] tables; replaces --black/--white
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Board size as WIDTHxHEIGHT
    #[arg(long, default_value = "9x9")]
    size: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    log_level: String,
}

impl Cli {
    fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        parse_size(&self.size)?;
        Ok(())
    }

    fn agents(&self) -> Result<(AgentConfig, AgentConfig)> {
        let (black, white) = match &self.config {
            Some(path) => {
                let config = MatchConfig::load_from_path(path)?;
                (config.black, config.white)
            }
            None => (
                AgentConfig::from_args(&self.black).context("invalid --black agent")?,
                AgentConfig::from_args(&self.white).context("invalid --white agent")?,
            ),
        };
        Ok((apply_env_overrides(black)?, apply_env_overrides(white)?))
    }
}

fn parse_size(size: &str) -> Result<(usize, usize)> {
    let (width, height) = size
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("invalid size '{}', expected WIDTHxHEIGHT", size))?;
    let width = width
        .trim()
        .parse()
        .with_context(|| format!("invalid board width in '{}'", size))?;
    let height = height
        .trim()
        .parse()
        .with_context(|| format!("invalid board height in '{}'", size))?;
    NoGoBoard::new(width, height)?;
    Ok((width, height))
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    init_tracing(&cli.log_level)?;
    info!(log_level = %cli.log_level, "Tracing initialized");

    let (width, height) = parse_size(&cli.size)?;
    let (black_config, white_config) = cli.agents()?;
    info!(
        black = %black_config.name,
        black_player = %black_config.player,
        white = %white_config.name,
        white_player = %white_config.player,
        games = cli.games,
        width,
        height,
        "Starting match"
    );

    let mut black = build_selector::<NoGoBoard>(&black_config);
    let mut white = build_selector::<NoGoBoard>(&white_config);

    let mut black_wins = 0u32;
    let mut white_wins = 0u32;
    for game in 1..=cli.games {
        let board = NoGoBoard::new(width, height)?;
        let record = play_match(black.as_mut(), white.as_mut(), board)
            .with_context(|| format!("game {} aborted", game))?;

        match record.winner {
            Color::Black => black_wins += 1,
            Color::White => white_wins += 1,
        }
        info!(
            game,
            winner = %record.winner,
            moves = record.moves.len(),
            "Game finished"
        );
    }

    info!(
        black = %black_config.name,
        white = %white_config.name,
        black_wins,
        white_wins,
        "Match complete"
    );
    Ok(())
}
