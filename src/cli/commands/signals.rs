//! Signals command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use stochastic_config::load_config_or_default;
use stochastic_data::{evaluate_csv, write_signals_csv};
use stochastic_monitor::SignalReport;
use stochastic_strategies::StrategyRegistry;
use tracing::info;

use crate::cli::{OutputFormat, SignalsArgs};

pub async fn run(args: SignalsArgs, config_path: &Path) -> Result<()> {
    let config = load_config_or_default(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let data_path = match args.data.as_ref().or(config.data.path.as_ref()) {
        Some(path) => path.clone(),
        None => anyhow::bail!("Please provide a data file with --data (e.g. --data ./prices.csv)"),
    };
    let symbol = args.symbol.clone().unwrap_or(config.data.symbol);

    // Command line settings win over the file
    let mut base = config.strategy;
    if args.macd {
        base.use_macd = true;
    }
    if let Some(k) = args.k_period {
        base.k_period = k;
    }
    if let Some(d) = args.d_period {
        base.d_period = d;
    }
    if let Some(trend) = args.trend_period {
        base.trend_period = trend;
    }

    let registry = StrategyRegistry::new();
    let info = registry.get(&args.strategy).with_context(|| {
        format!(
            "Unknown strategy '{}'. Available: {:?}",
            args.strategy,
            registry.names()
        )
    })?;
    let strategy_config = registry
        .resolve_config(&args.strategy, base, vec![symbol.clone()])
        .context("Invalid strategy configuration")?;

    info!(
        strategy = %info.name,
        symbol = %symbol,
        path = %data_path.display(),
        "Computing signals"
    );

    let rows = evaluate_csv(&data_path, &symbol, config.data.timeframe, strategy_config)
        .await
        .with_context(|| format!("Failed to evaluate {}", data_path.display()))?;
    let report = SignalReport::from_rows(&symbol, &info.name, rows);

    info!(
        bars = report.bars,
        buys = report.buy_signals,
        sells = report.sell_signals,
        "Signals computed"
    );

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary(args.tail)),
    }

    if let Some(save_path) = &args.save {
        write_signals_csv(save_path, &report.rows)?;
        info!("Signals saved to {:?}", save_path);
    }

    Ok(())
}
