//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use stochastic_config::load_config;
use stochastic_core::traits::StrategyConfig;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    // `signals` trades the data symbol when none is configured
    let mut strategy = config.strategy.clone();
    if strategy.symbols.is_empty() {
        strategy.symbols.push(config.data.symbol.clone());
    }
    if let Err(e) = strategy.validate() {
        println!("Strategy configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    match &config.data.path {
        Some(path) => println!("Data: {} ({})", path.display(), config.data.symbol),
        None => println!("Data: <none> ({})", config.data.symbol),
    }
    println!("Timeframe: {}", config.data.timeframe);
    println!("Symbols: {}", strategy.symbols.join(", "));
    println!(
        "Stochastic: %K {} / %D {}, zones {}/{}",
        strategy.k_period, strategy.d_period, strategy.oversold, strategy.overbought
    );
    println!("Trend EMA: {}", strategy.trend_period);
    if strategy.use_macd {
        println!(
            "MACD: {}/{}/{}",
            strategy.macd_fast, strategy.macd_slow, strategy.macd_signal
        );
    } else {
        println!("MACD: off");
    }

    Ok(())
}
