//! Export of annotated signal rows.

use chrono::DateTime;
use serde::Serialize;
use std::io;
use std::path::Path;
use stochastic_core::error::DataError;
use stochastic_strategies::SignalRow;

#[derive(Serialize)]
struct SignalRecord<'a> {
    timestamp: i64,
    date: String,
    close: f64,
    ema: Option<f64>,
    k: Option<f64>,
    d: Option<f64>,
    macd: Option<f64>,
    macd_signal: Option<f64>,
    zone: String,
    signal: &'a str,
}

impl<'a> From<&'a SignalRow> for SignalRecord<'a> {
    fn from(row: &'a SignalRow) -> Self {
        let when = DateTime::from_timestamp_millis(row.timestamp).unwrap_or_default();
        Self {
            timestamp: row.timestamp,
            date: when.format("%Y-%m-%d %H:%M:%S").to_string(),
            close: row.close,
            ema: row.ema,
            k: row.k,
            d: row.d,
            macd: row.macd,
            macd_signal: row.macd_signal,
            zone: row.zone.map(|z| z.to_string()).unwrap_or_default(),
            signal: row.signal.map(|s| s.label()).unwrap_or(""),
        }
    }
}

/// Write signal rows as CSV to any writer.
///
/// Undefined indicator values are written as empty cells.
pub fn write_signals<W: io::Write>(writer: W, rows: &[SignalRow]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer
            .serialize(SignalRecord::from(row))
            .map_err(|e| DataError::WriteError(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| DataError::WriteError(e.to_string()))
}

/// Write signal rows to a CSV file.
pub fn write_signals_csv(path: &Path, rows: &[SignalRow]) -> Result<(), DataError> {
    let file = std::fs::File::create(path)
        .map_err(|e| DataError::WriteError(format!("{}: {}", path.display(), e)))?;
    write_signals(io::BufWriter::new(file), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stochastic_core::types::SignalType;
    use stochastic_indicators::Zone;

    fn rows() -> Vec<SignalRow> {
        vec![
            SignalRow {
                timestamp: 0,
                close: 10.0,
                ema: Some(10.0),
                k: None,
                d: None,
                macd: None,
                macd_signal: None,
                zone: None,
                signal: None,
            },
            SignalRow {
                timestamp: 86_400_000,
                close: 9.5,
                ema: Some(9.75),
                k: Some(15.0),
                d: Some(12.5),
                macd: None,
                macd_signal: None,
                zone: Some(Zone::Oversold),
                signal: Some(SignalType::Buy),
            },
        ]
    }

    #[test]
    fn test_write_signals() {
        let mut buffer = Vec::new();
        write_signals(&mut buffer, &rows()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "timestamp,date,close,ema,k,d,macd,macd_signal,zone,signal"
        );
        assert_eq!(lines[1], "0,1970-01-01 00:00:00,10.0,10.0,,,,,,");
        assert_eq!(
            lines[2],
            "86400000,1970-01-02 00:00:00,9.5,9.75,15.0,12.5,,,oversold,Buy"
        );
    }

    #[test]
    fn test_write_signals_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.csv");

        write_signals_csv(&path, &rows()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);

        let bad = dir.path().join("missing").join("signals.csv");
        assert!(matches!(
            write_signals_csv(&bad, &rows()),
            Err(DataError::WriteError(_))
        ));
    }
}
