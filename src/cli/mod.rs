//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stochastic")]
#[command(author, version, about = "Stochastic oscillator trading signals")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "STOCHASTIC_CONFIG")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute indicators and signals for a price history
    Signals(SignalsArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
    /// Write the default configuration file
    InitConfig(InitConfigArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Data file (CSV); defaults to `data.path` from the config
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Symbol the data file holds
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Strategy variant
    #[arg(short, long, default_value = "stochastic")]
    pub strategy: String,

    /// Require MACD confirmation
    #[arg(long)]
    pub macd: bool,

    /// %K lookback
    #[arg(long)]
    pub k_period: Option<usize>,

    /// %D smoothing period
    #[arg(long)]
    pub d_period: Option<usize>,

    /// Trend EMA period
    #[arg(long)]
    pub trend_period: Option<usize>,

    /// Number of trailing bars to print
    #[arg(long, default_value = "10")]
    pub tail: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Save annotated rows to a CSV file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct InitConfigArgs {
    /// Where to write; defaults to the global --config path
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
