//! Trading signal types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalType {
    /// Enter or add to a long position
    Buy,
    /// Enter a short position or exit a long
    Sell,
    /// No action
    Hold,
}

impl SignalType {
    /// Label used in exported tables. `Hold` renders as an empty cell.
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::Buy => "Buy",
            SignalType::Sell => "Sell",
            SignalType::Hold => "",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, SignalType::Hold)
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative strength of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
}

/// Extra context attached to a signal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalMetadata {
    /// Name of the strategy that produced the signal
    pub strategy_name: String,
    /// Indicator values at the signal bar
    pub indicators: HashMap<String, f64>,
    /// Human-readable explanation
    pub reason: String,
}

/// A trading signal emitted by a strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub signal_type: SignalType,
    pub strength: SignalStrength,
    /// Close price of the signal bar
    pub price: f64,
    /// Unix timestamp in milliseconds of the signal bar
    pub timestamp: i64,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub metadata: SignalMetadata,
}

impl Signal {
    /// Look up an indicator value recorded with the signal.
    pub fn indicator(&self, name: &str) -> Option<f64> {
        self.metadata.indicators.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_type_labels() {
        assert_eq!(SignalType::Buy.to_string(), "Buy");
        assert_eq!(SignalType::Sell.to_string(), "Sell");
        assert_eq!(SignalType::Hold.to_string(), "");
        assert!(!SignalType::Hold.is_actionable());
    }

    #[test]
    fn test_signal_indicator_lookup() {
        let signal = Signal {
            symbol: "TEST".to_string(),
            signal_type: SignalType::Buy,
            strength: SignalStrength::Moderate,
            price: 100.0,
            timestamp: 0,
            confidence: 0.7,
            metadata: SignalMetadata {
                indicators: [("k".to_string(), 15.0)].into_iter().collect(),
                ..Default::default()
            },
        };

        assert_eq!(signal.indicator("k"), Some(15.0));
        assert_eq!(signal.indicator("d"), None);
        assert!(SignalStrength::Strong > SignalStrength::Moderate);
    }
}
