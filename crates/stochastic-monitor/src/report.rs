//! Signal report generation.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use stochastic_core::types::SignalType;
use stochastic_strategies::SignalRow;

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════\n";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────────────────────\n";

/// Summary of a signal run over one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReport {
    pub symbol: String,
    pub strategy: String,
    /// Bars loaded
    pub bars: usize,
    /// Bars with both %K and %D defined
    pub evaluated_bars: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    /// Most recent actionable row
    pub last_signal: Option<SignalRow>,
    pub rows: Vec<SignalRow>,
}

impl SignalReport {
    /// Build a report from annotated rows.
    pub fn from_rows(symbol: &str, strategy: &str, rows: Vec<SignalRow>) -> Self {
        let count = |kind: SignalType| rows.iter().filter(|r| r.signal == Some(kind)).count();

        Self {
            symbol: symbol.to_string(),
            strategy: strategy.to_string(),
            bars: rows.len(),
            evaluated_bars: rows.iter().filter(|r| r.d.is_some()).count(),
            buy_signals: count(SignalType::Buy),
            sell_signals: count(SignalType::Sell),
            first_timestamp: rows.first().map(|r| r.timestamp),
            last_timestamp: rows.last().map(|r| r.timestamp),
            last_signal: rows.iter().rev().find(|r| r.signal.is_some()).cloned(),
            rows,
        }
    }

    pub fn total_signals(&self) -> usize {
        self.buy_signals + self.sell_signals
    }

    /// Generate a text summary with the last `tail` rows.
    pub fn summary(&self, tail: usize) -> String {
        let mut s = String::new();

        s.push_str(RULE);
        s.push_str(&format!("  STOCHASTIC SIGNALS  {}  ({})\n", self.symbol, self.strategy));
        s.push_str(RULE);
        s.push('\n');

        s.push_str("OVERVIEW\n");
        s.push_str(THIN_RULE);
        s.push_str(&format!(
            "  Period:              {} .. {}\n",
            format_time(self.first_timestamp),
            format_time(self.last_timestamp)
        ));
        s.push_str(&format!("  Bars:                {}\n", self.bars));
        s.push_str(&format!("  Evaluated Bars:      {}\n", self.evaluated_bars));
        s.push_str(&format!("  Buy Signals:         {}\n", self.buy_signals));
        s.push_str(&format!("  Sell Signals:        {}\n", self.sell_signals));
        match &self.last_signal {
            Some(row) => s.push_str(&format!(
                "  Last Signal:         {} at {} ({:.2})\n",
                row.signal.map(|t| t.label()).unwrap_or_default(),
                format_time(Some(row.timestamp)),
                row.close
            )),
            None => s.push_str("  Last Signal:         none\n"),
        }
        s.push('\n');

        let start = self.rows.len().saturating_sub(tail);
        if start < self.rows.len() {
            s.push_str(&format!("LAST {} BARS\n", self.rows.len() - start));
            s.push_str(THIN_RULE);
            s.push_str(&format!(
                "  {:<19} {:>10} {:>10} {:>7} {:>7} {:>9} {:>9}  {}\n",
                "Date", "Close", "EMA", "%K", "%D", "MACD", "MACD Sig", "Signal"
            ));
            for row in &self.rows[start..] {
                s.push_str(&format!(
                    "  {:<19} {:>10.2} {:>10} {:>7} {:>7} {:>9} {:>9}  {}\n",
                    format_time(Some(row.timestamp)),
                    row.close,
                    format_value(row.ema, 2),
                    format_value(row.k, 1),
                    format_value(row.d, 1),
                    format_value(row.macd, 3),
                    format_value(row.macd_signal, 3),
                    row.signal.map(|t| t.label()).unwrap_or_default(),
                ));
            }
            s.push('\n');
        }

        s.push_str(RULE);
        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn format_time(timestamp: Option<i64>) -> String {
    match timestamp.and_then(DateTime::from_timestamp_millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

fn format_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}
