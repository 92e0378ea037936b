//! Moving average indicators.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use stochastic_core::error::IndicatorError;
use stochastic_core::traits::{Indicator, StreamingIndicator};

fn check_period(period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "Period must be greater than 0".into(),
        ));
    }
    Ok(())
}

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    pub fn try_new(period: usize) -> Result<Self, IndicatorError> {
        check_period(period)?;
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// How an EMA obtains its first value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSeed {
    /// Seed with the first input and emit a value for every input.
    ///
    /// Equivalent to a recursive EMA without bias adjustment, the
    /// convention most charting packages use for long trend filters.
    #[default]
    FirstValue,
    /// Seed with the SMA of the first `period` inputs.
    Sma,
}

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices using an exponential decay with
/// `alpha = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    seed: EmaSeed,
}

impl Ema {
    /// Create a new EMA seeded with the first value.
    pub fn new(period: usize) -> Self {
        Self::with_seed(period, EmaSeed::FirstValue)
    }

    /// Create an EMA with an explicit seeding mode.
    pub fn with_seed(period: usize, seed: EmaSeed) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            seed,
        }
    }

    pub fn try_new(period: usize, seed: EmaSeed) -> Result<Self, IndicatorError> {
        check_period(period)?;
        Ok(Self::with_seed(period, seed))
    }

    pub fn seed(&self) -> EmaSeed {
        self.seed
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period() {
            return vec![];
        }

        let (initial, rest) = match self.seed {
            EmaSeed::FirstValue => (data[0], &data[1..]),
            EmaSeed::Sma => (
                data[..self.period].iter().sum::<f64>() / self.period as f64,
                &data[self.period..],
            ),
        };

        let mut result = Vec::with_capacity(rest.len() + 1);
        result.push(initial);

        let mut ema = initial;
        let one_minus_mult = 1.0 - self.multiplier;
        for &price in rest {
            ema = price * self.multiplier + ema * one_minus_mult;
            result.push(ema);
        }

        result
    }

    fn period(&self) -> usize {
        match self.seed {
            EmaSeed::FirstValue => 1,
            EmaSeed::Sma => self.period,
        }
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Streaming SMA over a fixed window.
#[derive(Debug, Clone)]
pub struct StreamingSma {
    period: usize,
    window: VecDeque<f64>,
}

impl StreamingSma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            window: VecDeque::with_capacity(period),
        }
    }
}

impl StreamingIndicator for StreamingSma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(value);
        self.current()
    }

    fn current(&self) -> Option<f64> {
        self.is_ready()
            .then(|| self.window.iter().sum::<f64>() / self.period as f64)
    }

    fn reset(&mut self) {
        self.window.clear();
    }

    fn is_ready(&self) -> bool {
        self.window.len() >= self.period
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Streaming EMA that maintains state for incremental updates.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    multiplier: f64,
    seed: EmaSeed,
    current: Option<f64>,
    count: usize,
    sum: f64,
}

impl StreamingEma {
    /// Create a new streaming EMA seeded with the first value.
    pub fn new(period: usize) -> Self {
        Self::with_seed(period, EmaSeed::FirstValue)
    }

    pub fn with_seed(period: usize, seed: EmaSeed) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            seed,
            current: None,
            count: 0,
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for StreamingEma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        self.count += 1;

        self.current = match (self.current, self.seed) {
            (Some(ema), _) => Some(value * self.multiplier + ema * (1.0 - self.multiplier)),
            (None, EmaSeed::FirstValue) => Some(value),
            (None, EmaSeed::Sma) => {
                // Accumulating for the initial SMA
                self.sum += value;
                (self.count == self.period).then(|| self.sum / self.period as f64)
            }
        };

        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
        self.count = 0;
        self.sum = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn period(&self) -> usize {
        match self.seed {
            EmaSeed::FirstValue => 1,
            EmaSeed::Sma => self.period,
        }
    }

    fn name(&self) -> &str {
        "EMA"
    }
}
