//! Price history loading and signal export.

mod csv_source;
mod export;

pub use csv_source::CsvDataSource;
pub use export::{write_signals, write_signals_csv};

use std::path::Path;
use stochastic_core::error::DataError;
use stochastic_core::traits::StrategyConfig;
use stochastic_core::types::{Bar, Timeframe};
use stochastic_core::TradingResult;
use stochastic_strategies::{SignalRow, StochasticConfig, StochasticStrategy};

/// Load bars from a CSV file.
pub async fn load_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<Vec<Bar>, DataError> {
    let source = CsvDataSource::new(path)?;
    source.load_all(symbol, timeframe).await
}

/// Load a CSV file and annotate every bar with the configured strategy.
pub async fn evaluate_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    timeframe: Timeframe,
    config: StochasticConfig,
) -> TradingResult<Vec<SignalRow>> {
    config.validate()?;
    let bars = load_csv(path, symbol, timeframe).await?;
    Ok(StochasticStrategy::new(config).evaluate(&bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use stochastic_core::error::StrategyError;
    use stochastic_core::types::SignalType;
    use stochastic_core::TradingError;

    fn config() -> StochasticConfig {
        StochasticConfig {
            symbols: vec!["TEST".to_string()],
            k_period: 5,
            d_period: 3,
            trend_period: 3,
            ..Default::default()
        }
    }

    fn dip_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close").unwrap();
        let closes = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 0.5, 0.4, 1.9];
        for (day, close) in closes.iter().enumerate() {
            writeln!(file, "2024-01-{:02},{},10,0,{}", day + 1, close, close).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_evaluate_csv() {
        let file = dip_csv();
        let rows = evaluate_csv(file.path(), "TEST", Timeframe::Daily, config())
            .await
            .unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[9].signal, Some(SignalType::Buy));
        assert!(rows[..9].iter().all(|r| r.signal.is_none()));
    }

    #[tokio::test]
    async fn test_evaluate_csv_errors() {
        let file = dip_csv();
        let mut bad = config();
        bad.k_period = 0;
        let result = evaluate_csv(file.path(), "TEST", Timeframe::Daily, bad).await;
        assert!(matches!(
            result,
            Err(TradingError::Strategy(StrategyError::InvalidConfig(_)))
        ));

        let result = evaluate_csv("/definitely/not/here.csv", "TEST", Timeframe::Daily, config()).await;
        assert!(matches!(
            result,
            Err(TradingError::Data(DataError::FileNotFound(_)))
        ));
    }
}
