//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stochastic_core::error::DataError;
use stochastic_core::traits::DataSource;
use stochastic_core::types::{Bar, Timeframe};
use tracing::{debug, info, warn};

/// CSV record format.
///
/// Prices are optional so that rows with blank cells can be dropped
/// instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        default,
        alias = "Date",
        alias = "Datetime",
        alias = "datetime",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: Option<String>,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

impl CsvRecord {
    /// Prices of the row, or None if any is missing or NaN.
    fn prices(&self) -> Option<[f64; 4]> {
        let prices = [self.open?, self.high?, self.low?, self.close?];
        prices.iter().all(|p| !p.is_nan()).then_some(prices)
    }
}

/// CSV data source for historical data.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all bars from the CSV file.
    pub async fn load_all(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
        // csv reads synchronously; keep it off the async workers
        let path = self.path.clone();
        let bars = tokio::task::spawn_blocking(move || Self::load_from_path(&path))
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))??;
        info!(
            symbol,
            %timeframe,
            bars = bars.len(),
            path = %self.path.display(),
            "Loaded bars from CSV"
        );
        Ok(bars)
    }

    /// Load bars from a specific path.
    fn load_from_path(path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::ParseError(e.to_string()))?;
        let has = |name: &str| headers.iter().any(|h| h.eq_ignore_ascii_case(name));
        // Adjusted closes don't share a scale with unadjusted O/H/L
        if !has("close") && (has("adj close") || has("adj_close")) {
            return Err(DataError::ParseError(
                "found 'Adj Close' but no 'Close' column; adjusted closes cannot be \
                 combined with unadjusted Open/High/Low, export the raw Close column"
                    .to_string(),
            ));
        }

        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for (index, result) in reader.deserialize().enumerate() {
            let row = index + 1;
            let record: CsvRecord =
                result.map_err(|e| DataError::ParseError(format!("row {}: {}", row, e)))?;

            let Some([open, high, low, close]) = record.prices() else {
                debug!(row, "Dropping row with missing prices");
                dropped += 1;
                continue;
            };

            let timestamp = match record.date.as_deref() {
                Some(date) if !date.is_empty() => parse_timestamp(date)
                    .map_err(|e| DataError::ParseError(format!("row {}: {}", row, e)))?,
                _ => row as i64,
            };

            let bar = Bar::new(
                timestamp,
                open,
                high,
                low,
                close,
                record.volume.unwrap_or_default(),
            );
            bar.validate()
                .map_err(|reason| DataError::InvalidBar { row, reason })?;
            bars.push(bar);
        }

        if dropped > 0 {
            warn!(dropped, path = %path.display(), "Dropped rows with missing values");
        }
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        // Stable: rows sharing a timestamp keep file order, so the last
        // row for a timestamp wins.
        bars.sort_by_key(|b| b.timestamp);
        let before = bars.len();
        bars.dedup_by(|later, kept| {
            let duplicate = later.timestamp == kept.timestamp;
            if duplicate {
                *kept = *later;
            }
            duplicate
        });
        if bars.len() < before {
            warn!(
                duplicates = before - bars.len(),
                path = %path.display(),
                "Replaced rows with duplicate timestamps by the last occurrence"
            );
        }

        Ok(bars)
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn load_bars(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
        self.load_all(symbol, timeframe).await
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse the date formats found in exported price history.
fn parse_timestamp(date_str: &str) -> Result<i64, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.timestamp_millis());
    }

    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp; milliseconds if more than 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(format!("Could not parse date: {}", date_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use stochastic_core::traits::Strategy;
    use stochastic_core::types::{BarSeries, SignalType};
    use stochastic_strategies::{StochasticConfig, StochasticStrategy};
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1970-01-02").unwrap(), 86_400_000);
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("2024-01-15T10:30:00Z").is_ok());
        assert_eq!(
            parse_timestamp("2022-01-03 00:00:00+05:30").unwrap(),
            parse_timestamp("2022-01-02 18:30:00").unwrap()
        );
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000); // Unix ms
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000); // Unix sec
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = CsvDataSource::new("/definitely/not/here.csv");
        assert!(matches!(result, Err(DataError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_sorted_with_dates() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-03,101,103,100,102,1500\n\
             2024-01-02,100,102,99,101,1000\n",
        );
        let source = CsvDataSource::new(file.path()).unwrap();
        let bars = source.load_bars("TEST", Timeframe::Daily).await.unwrap();

        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[1].volume, 1500.0);
        assert_eq!(source.name(), "csv");
    }

    #[tokio::test]
    async fn test_load_without_date_column() {
        let file = write_csv("Open,High,Low,Close\n10,11,9,10.5\n10.5,12,10,11.5\n");
        let source = CsvDataSource::new(file.path()).unwrap();
        let bars = source.load_all("TEST", Timeframe::Daily).await.unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1);
        assert_eq!(bars[1].timestamp, 2);
        assert_eq!(bars[1].volume, 0.0);
    }

    #[tokio::test]
    async fn test_rows_with_missing_values_are_dropped() {
        let file = write_csv(
            "Date,Open,High,Low,Close\n\
             2024-01-01,10,11,9,10\n\
             2024-01-02,,11,9,10\n\
             2024-01-03,10,NaN,9,10\n\
             2024-01-04,10,12,9,11\n",
        );
        let bars = CsvDataSource::new(file.path())
            .unwrap()
            .load_all("TEST", Timeframe::Daily)
            .await
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 11.0);
    }

    #[tokio::test]
    async fn test_adj_close_without_close_rejected() {
        // Adjusted close below the unadjusted low after a dividend
        let file = write_csv("Date,Open,High,Low,Adj Close\n2024-01-01,100,102,99,97.5\n");
        let result = CsvDataSource::new(file.path())
            .unwrap()
            .load_all("TEST", Timeframe::Daily)
            .await;

        match result {
            Err(DataError::ParseError(msg)) => assert!(msg.contains("'Close'")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_close_preferred_over_adj_close() {
        let file = write_csv("Date,Open,High,Low,Close,Adj Close\n2024-01-01,10,11,9,10.5,10.1\n");
        let bars = CsvDataSource::new(file.path())
            .unwrap()
            .load_all("TEST", Timeframe::Daily)
            .await
            .unwrap();

        assert_eq!(bars[0].close, 10.5);
    }

    #[tokio::test]
    async fn test_invalid_bar_rejected() {
        let file = write_csv(
            "Date,Open,High,Low,Close\n\
             2024-01-01,10,11,9,10\n\
             2024-01-02,10,9,11,10\n",
        );
        let result = CsvDataSource::new(file.path())
            .unwrap()
            .load_all("TEST", Timeframe::Daily)
            .await;

        assert!(matches!(result, Err(DataError::InvalidBar { row: 2, .. })));
    }

    #[tokio::test]
    async fn test_duplicate_timestamps_keep_last_row() {
        let mut csv = String::from("Date,Open,High,Low,Close\n");
        let closes = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 0.5, 0.4, 1.9];
        for (day, close) in closes.iter().enumerate() {
            csv.push_str(&format!("2024-01-{:02},{},10,0,{}\n", day + 1, close, close));
        }
        // Corrected quote for 2024-01-09 appended at the end of the file
        csv.push_str("2024-01-09,2.5,10,0,2.5\n");
        let file = write_csv(&csv);

        let bars = crate::load_csv(file.path(), "TEST", Timeframe::Daily)
            .await
            .unwrap();
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[8].close, 2.5);
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        // Batch evaluation and bar-by-bar processing agree on the loaded bars
        let config = StochasticConfig {
            symbols: vec!["TEST".to_string()],
            k_period: 5,
            d_period: 3,
            trend_period: 3,
            ..Default::default()
        };
        let mut strategy = StochasticStrategy::new(config);
        let expected: Vec<(i64, SignalType)> = strategy
            .evaluate(&bars)
            .iter()
            .filter_map(|r| r.signal.map(|s| (r.timestamp, s)))
            .collect();

        let mut series = BarSeries::new("TEST".to_string(), Timeframe::Daily);
        let mut actual = Vec::new();
        for bar in &bars {
            series.push(*bar);
            if let Some(signal) = strategy.on_bar(&series) {
                actual.push((signal.timestamp, signal.signal_type));
            }
        }
        assert_eq!(expected, actual);
        assert_eq!(strategy.state().bars_processed, 10);
    }

    #[tokio::test]
    async fn test_empty_file() {
        let file = write_csv("Date,Open,High,Low,Close\n");
        let result = CsvDataSource::new(file.path())
            .unwrap()
            .load_all("TEST", Timeframe::Daily)
            .await;

        assert!(matches!(result, Err(DataError::NoDataAvailable)));
    }
}
