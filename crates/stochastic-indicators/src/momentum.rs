//! Momentum indicators.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use stochastic_core::error::IndicatorError;
use stochastic_core::traits::{Indicator, MultiOutputIndicator, StreamingIndicator};
use stochastic_core::types::Bar;

use crate::moving_average::{Ema, EmaSeed, Sma, StreamingEma, StreamingSma};

/// %K reported when the lookback window has no range (highest == lowest).
pub const DEGENERATE_K: f64 = 50.0;

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    seed: EmaSeed,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
            seed: EmaSeed::FirstValue,
        }
    }

    pub fn try_with_periods(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        if fast == 0 || slow == 0 || signal == 0 {
            return Err(IndicatorError::InvalidParameter(
                "MACD periods must be greater than 0".into(),
            ));
        }
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast period ({}) must be less than slow period ({})",
                fast, slow
            )));
        }
        Ok(Self::with_periods(fast, slow, signal))
    }

    /// Use a different EMA seeding mode for all three averages.
    pub fn with_seed(mut self, seed: EmaSeed) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        let fast_ema = Ema::with_seed(self.fast_period, self.seed).calculate(data);
        let slow_ema = Ema::with_seed(self.slow_period, self.seed).calculate(data);

        // Both series end on the last input; align them on the shorter one.
        let fast_ema = &fast_ema[fast_ema.len() - slow_ema.len()..];
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = Ema::with_seed(self.signal_period, self.seed).calculate(&macd_line);
        if signal_line.is_empty() {
            return vec![];
        }

        macd_line[macd_line.len() - signal_line.len()..]
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        match self.seed {
            EmaSeed::FirstValue => 1,
            EmaSeed::Sma => self.slow_period + self.signal_period - 1,
        }
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Bar-by-bar MACD.
#[derive(Debug, Clone)]
pub struct StreamingMacd {
    fast: StreamingEma,
    slow: StreamingEma,
    signal: StreamingEma,
    current: Option<MacdOutput>,
}

impl StreamingMacd {
    pub fn new(fast: usize, slow: usize, signal: usize, seed: EmaSeed) -> Self {
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: StreamingEma::with_seed(fast, seed),
            slow: StreamingEma::with_seed(slow, seed),
            signal: StreamingEma::with_seed(signal, seed),
            current: None,
        }
    }
}

impl StreamingIndicator for StreamingMacd {
    type Input = f64;
    type Output = MacdOutput;

    fn update(&mut self, price: f64) -> Option<MacdOutput> {
        let fast = self.fast.update(price);
        let slow = self.slow.update(price);

        if let (Some(fast), Some(slow)) = (fast, slow) {
            let macd = fast - slow;
            self.current = self.signal.update(macd).map(|signal| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            });
        }

        self.current
    }

    fn current(&self) -> Option<MacdOutput> {
        self.current
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn period(&self) -> usize {
        self.slow.period() + self.signal.period() - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (fast stochastic)
    pub k: f64,
    /// %D (SMA of %K)
    pub d: f64,
}

/// Raw %K for one window. Clamped to [0, 100]; a flat window yields
/// [`DEGENERATE_K`].
#[inline]
pub fn percent_k(close: f64, lowest: f64, highest: f64) -> f64 {
    let range = highest - lowest;
    if range <= 0.0 {
        DEGENERATE_K
    } else {
        (((close - lowest) / range) * 100.0).clamp(0.0, 100.0)
    }
}

/// Stochastic oscillator.
///
/// Compares the closing price to the high/low range over `k_period` bars;
/// %D smooths %K with an SMA over `d_period` values.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(k_period: usize, d_period: usize) -> Self {
        assert!(k_period > 0 && d_period > 0);
        Self { k_period, d_period }
    }

    pub fn try_with_periods(k_period: usize, d_period: usize) -> Result<Self, IndicatorError> {
        if k_period == 0 || d_period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "Stochastic periods must be greater than 0".into(),
            ));
        }
        Ok(Self::with_periods(k_period, d_period))
    }

    pub fn k_period(&self) -> usize {
        self.k_period
    }

    pub fn d_period(&self) -> usize {
        self.d_period
    }

    /// Raw %K series, first value at index `k_period - 1` of the input.
    pub fn percent_k_series(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let len = high.len().min(low.len()).min(close.len());
        if len < self.k_period {
            return vec![];
        }

        ((self.k_period - 1)..len)
            .map(|i| {
                let start = i + 1 - self.k_period;
                let highest = high[start..=i]
                    .iter()
                    .cloned()
                    .fold(f64::NEG_INFINITY, f64::max);
                let lowest = low[start..=i]
                    .iter()
                    .cloned()
                    .fold(f64::INFINITY, f64::min);
                percent_k(close[i], lowest, highest)
            })
            .collect()
    }

    /// Calculate stochastic from OHLC data.
    ///
    /// The first output corresponds to input index `k_period + d_period - 2`.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<StochasticOutput> {
        let k_values = self.percent_k_series(high, low, close);
        let d_values = Sma::new(self.d_period).calculate(&k_values);

        k_values[k_values.len() - d_values.len()..]
            .iter()
            .zip(d_values)
            .map(|(&k, d)| StochasticOutput { k, d })
            .collect()
    }

    /// Calculate stochastic from bars.
    pub fn calculate_bars(&self, bars: &[Bar]) -> Vec<StochasticOutput> {
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.calculate_ohlc(&high, &low, &close)
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Stochastic {
    type Output = StochasticOutput;

    /// Close-only variant: the close stands in for the high and low.
    /// Prefer `calculate_ohlc` for real bars.
    fn calculate(&self, data: &[f64]) -> Vec<StochasticOutput> {
        self.calculate_ohlc(data, data, data)
    }

    fn period(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

/// Bar-by-bar stochastic oscillator.
#[derive(Debug, Clone)]
pub struct StreamingStochastic {
    k_period: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    k: Option<f64>,
    d: StreamingSma,
}

impl StreamingStochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        assert!(k_period > 0 && d_period > 0);
        Self {
            k_period,
            highs: VecDeque::with_capacity(k_period),
            lows: VecDeque::with_capacity(k_period),
            k: None,
            d: StreamingSma::new(d_period),
        }
    }

    /// Latest %K, available before %D is.
    pub fn k(&self) -> Option<f64> {
        self.k
    }
}

impl StreamingIndicator for StreamingStochastic {
    type Input = Bar;
    type Output = StochasticOutput;

    fn update(&mut self, bar: Bar) -> Option<StochasticOutput> {
        if self.highs.len() == self.k_period {
            self.highs.pop_front();
            self.lows.pop_front();
        }
        self.highs.push_back(bar.high);
        self.lows.push_back(bar.low);

        if self.highs.len() < self.k_period {
            return None;
        }

        let highest = self.highs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let lowest = self.lows.iter().cloned().fold(f64::INFINITY, f64::min);
        let k = percent_k(bar.close, lowest, highest);
        self.k = Some(k);

        self.d.update(k).map(|d| StochasticOutput { k, d })
    }

    fn current(&self) -> Option<StochasticOutput> {
        let k = self.k?;
        self.d.current().map(|d| StochasticOutput { k, d })
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.k = None;
        self.d.reset();
    }

    fn is_ready(&self) -> bool {
        self.d.is_ready()
    }

    fn period(&self) -> usize {
        self.k_period + self.d.period() - 1
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let mid = 100.0 + (i as f64 * 0.35).sin() * 8.0 + i as f64 * 0.1;
                let close = mid + (i as f64 * 1.3).cos() * 1.5;
                Bar::new(i as i64, mid, mid + 2.0, mid - 2.0, close, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_macd_basic() {
        let macd = Macd::new().with_seed(EmaSeed::Sma);
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        // 50 - (26 + 9 - 1) + 1
        assert_eq!(result.len(), 17);
        // In an uptrend, MACD should be positive
        assert!(result.last().unwrap().macd > 0.0);
    }

    #[test]
    fn test_macd_first_value_seed_covers_every_input() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), data.len());
        // Fast and slow EMAs both start at the first price
        assert!(result[0].macd.abs() < 1e-12);
        assert!(result[0].histogram.abs() < 1e-12);
        assert!(result.last().unwrap().histogram > 0.0);
    }

    #[test]
    fn test_macd_invalid_periods() {
        assert!(Macd::try_with_periods(26, 12, 9).is_err());
        assert!(Macd::try_with_periods(0, 12, 9).is_err());
        assert!(Macd::try_with_periods(5, 10, 3).is_ok());
    }

    #[test]
    fn test_streaming_macd_matches_batch() {
        let data: Vec<f64> = wave_bars(80).iter().map(|b| b.close).collect();

        for seed in [EmaSeed::FirstValue, EmaSeed::Sma] {
            let batch = Macd::with_periods(5, 10, 3).with_seed(seed).calculate(&data);
            let mut streaming = StreamingMacd::new(5, 10, 3, seed);
            let streamed: Vec<MacdOutput> =
                data.iter().filter_map(|&p| streaming.update(p)).collect();

            assert_eq!(batch.len(), streamed.len());
            for (a, b) in batch.iter().zip(&streamed) {
                assert!((a.macd - b.macd).abs() < 1e-9);
                assert!((a.signal - b.signal).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_stochastic_basic() {
        let stoch = Stochastic::new();
        let high: Vec<f64> = (0..30).map(|i| 105.0 + i as f64).collect();
        let low: Vec<f64> = (0..30).map(|i| 95.0 + i as f64).collect();
        let close: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();

        let result = stoch.calculate_ohlc(&high, &low, &close);
        assert_eq!(result.len(), 30 - stoch.period() + 1);

        for output in &result {
            assert!(output.k >= 0.0 && output.k <= 100.0);
            assert!(output.d >= 0.0 && output.d <= 100.0);
        }
    }

    #[test]
    fn test_stochastic_known_value() {
        let stoch = Stochastic::with_periods(3, 1);
        let high = [10.0, 12.0, 11.0];
        let low = [8.0, 9.0, 6.0];
        let close = [9.0, 11.0, 9.0];

        // lowest low 6, highest high 12 -> (9 - 6) / 6 * 100 = 50
        let result = stoch.calculate_ohlc(&high, &low, &close);
        assert_eq!(result.len(), 1);
        assert!((result[0].k - 50.0).abs() < 1e-10);
        assert!((result[0].d - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_at_high() {
        let stoch = Stochastic::with_periods(5, 3);
        let high = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
        let low = vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let close = high.clone();

        let result = stoch.calculate_ohlc(&high, &low, &close);
        assert_eq!(result.len(), 2);
        assert!((result.last().unwrap().k - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_flat_window_uses_midpoint() {
        let stoch = Stochastic::with_periods(4, 2);
        let flat = vec![50.0; 10];

        let result = stoch.calculate_ohlc(&flat, &flat, &flat);
        assert!(!result.is_empty());
        for output in &result {
            assert_eq!(output.k, DEGENERATE_K);
            assert_eq!(output.d, DEGENERATE_K);
        }
    }

    #[test]
    fn test_percent_k_clamped() {
        // Close above the window high (inconsistent input)
        assert_eq!(percent_k(120.0, 90.0, 110.0), 100.0);
        assert_eq!(percent_k(80.0, 90.0, 110.0), 0.0);
        assert!((percent_k(100.0, 90.0, 110.0) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_insufficient_data() {
        let stoch = Stochastic::with_periods(14, 3);
        let bars = wave_bars(15);
        assert!(stoch.calculate_bars(&bars).is_empty());
        assert!(stoch.validate_data(&[1.0; 15]).is_err());
        assert!(Stochastic::try_with_periods(0, 3).is_err());
    }

    #[test]
    fn test_streaming_stochastic_matches_batch() {
        let bars = wave_bars(100);
        let batch = Stochastic::with_periods(14, 3).calculate_bars(&bars);

        let mut streaming = StreamingStochastic::new(14, 3);
        let streamed: Vec<StochasticOutput> =
            bars.iter().filter_map(|&b| streaming.update(b)).collect();

        assert_eq!(batch.len(), streamed.len());
        for (a, b) in batch.iter().zip(&streamed) {
            assert!((a.k - b.k).abs() < 1e-9);
            assert!((a.d - b.d).abs() < 1e-9);
        }
        assert_eq!(streaming.current(), streamed.last().copied());
    }

    #[test]
    fn test_streaming_stochastic_warmup_and_reset() {
        let bars = wave_bars(20);
        let mut streaming = StreamingStochastic::new(5, 3);

        for bar in &bars[..4] {
            assert!(streaming.update(*bar).is_none());
        }
        // %K is defined from the 5th bar, %D from the 7th
        assert!(streaming.update(bars[4]).is_none());
        assert!(streaming.k().is_some());
        assert!(streaming.update(bars[5]).is_none());
        assert!(streaming.update(bars[6]).is_some());
        assert_eq!(streaming.period(), 7);

        streaming.reset();
        assert!(!streaming.is_ready());
        assert!(streaming.k().is_none());
    }
}
