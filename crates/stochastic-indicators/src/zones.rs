//! Overbought / oversold zone classification for bounded oscillators.

use serde::{Deserialize, Serialize};
use std::fmt;
use stochastic_core::error::IndicatorError;

/// Where an oscillator value sits relative to its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Oversold,
    Neutral,
    Overbought,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Zone::Oversold => "oversold",
            Zone::Neutral => "neutral",
            Zone::Overbought => "overbought",
        };
        f.write_str(s)
    }
}

/// Zone thresholds on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            overbought: 80.0,
            oversold: 20.0,
        }
    }
}

impl Thresholds {
    pub fn new(overbought: f64, oversold: f64) -> Result<Self, IndicatorError> {
        let thresholds = Self {
            overbought,
            oversold,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Require `0 <= oversold < overbought <= 100`.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if !(0.0..=100.0).contains(&self.oversold) || !(0.0..=100.0).contains(&self.overbought) {
            return Err(IndicatorError::InvalidParameter(
                "Thresholds must be between 0 and 100".into(),
            ));
        }
        if self.oversold >= self.overbought {
            return Err(IndicatorError::InvalidParameter(format!(
                "Oversold ({}) must be below overbought ({})",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }

    /// Classify a value. The thresholds themselves count as neutral.
    pub fn classify(&self, value: f64) -> Zone {
        if value > self.overbought {
            Zone::Overbought
        } else if value < self.oversold {
            Zone::Oversold
        } else {
            Zone::Neutral
        }
    }

    /// True when `value` lies in the outer half of its extreme zone,
    /// e.g. at or below 10 / at or above 90 with the default thresholds.
    pub fn is_extreme(&self, value: f64) -> bool {
        value <= self.oversold / 2.0 || value >= (100.0 + self.overbought) / 2.0
    }
}
