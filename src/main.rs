//! Stochastic signals CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use stochastic_config::load_config_or_default;
use stochastic_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };

    // The log file directory and format come from the config file when it
    // loads; a broken config is reported by the command itself.
    let logging = load_config_or_default(&cli.config)
        .map(|c| c.logging)
        .unwrap_or_default();
    let _guard = setup_logging(
        log_level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref(),
    );

    match cli.command {
        Commands::Signals(args) => cli::commands::signals::run(args, &cli.config).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
        Commands::InitConfig(args) => cli::commands::init::run(args, &cli.config).await,
    }
}
