//! Stochastic Oscillator Strategy.
//!
//! Trades %K/%D crossovers inside the extreme zones, in the direction of
//! a long EMA trend filter:
//! - Buy when price is above the trend EMA, %K is oversold and %K crosses
//!   above %D.
//! - Sell when price is below the trend EMA, %K is overbought and %K
//!   crosses below %D.
//!
//! An optional MACD filter additionally requires the MACD line to be above
//! (buy) or below (sell) its signal line.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stochastic_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig, StrategyState, StreamingIndicator},
    types::{Bar, BarSeries, Signal, SignalMetadata, SignalStrength, SignalType},
};
use stochastic_indicators::{
    EmaSeed, MacdOutput, StochasticOutput, StreamingEma, StreamingMacd, StreamingStochastic,
    Thresholds, Zone,
};
use tracing::debug;

/// Configuration for the stochastic strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticConfig {
    /// Symbols to trade
    pub symbols: Vec<String>,
    /// Lookback window for the high/low range of %K
    pub k_period: usize,
    /// SMA window for %D
    pub d_period: usize,
    /// Trend filter EMA period
    pub trend_period: usize,
    /// Overbought threshold (sell zone above this)
    pub overbought: f64,
    /// Oversold threshold (buy zone below this)
    pub oversold: f64,
    /// Require MACD confirmation
    pub use_macd: bool,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Seeding of the trend and MACD EMAs
    pub ema_seed: EmaSeed,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self {
            symbols: vec![],
            k_period: 14,
            d_period: 3,
            trend_period: 200,
            overbought: 80.0,
            oversold: 20.0,
            use_macd: false,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_seed: EmaSeed::FirstValue,
        }
    }
}

impl StochasticConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            overbought: self.overbought,
            oversold: self.oversold,
        }
    }
}

impl StrategyConfig for StochasticConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.k_period == 0 || self.d_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Stochastic periods must be greater than 0".into(),
            ));
        }
        if self.trend_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Trend period must be greater than 0".into(),
            ));
        }
        self.thresholds()
            .validate()
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        if self.use_macd {
            if self.macd_fast == 0 || self.macd_signal == 0 {
                return Err(StrategyError::InvalidConfig(
                    "MACD periods must be greater than 0".into(),
                ));
            }
            if self.macd_fast >= self.macd_slow {
                return Err(StrategyError::InvalidConfig(
                    "MACD fast period must be less than slow period".into(),
                ));
            }
        }
        if self.symbols.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "At least one symbol required".into(),
            ));
        }
        Ok(())
    }
}

/// One bar annotated with indicator values and the resulting signal.
///
/// Indicator fields are `None` until the indicator has enough history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub timestamp: i64,
    pub close: f64,
    pub ema: Option<f64>,
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub zone: Option<Zone>,
    pub signal: Option<SignalType>,
}

/// Stochastic Oscillator Strategy.
pub struct StochasticStrategy {
    config: StochasticConfig,
    thresholds: Thresholds,
    trend: StreamingEma,
    stochastic: StreamingStochastic,
    macd: Option<StreamingMacd>,
    prev: Option<StochasticOutput>,
    last_row: Option<SignalRow>,
    bars_processed: usize,
    signals_generated: usize,
}

impl StochasticStrategy {
    /// Create a new stochastic strategy.
    ///
    /// The configuration should have passed [`StrategyConfig::validate`].
    pub fn new(config: StochasticConfig) -> Self {
        let macd = config.use_macd.then(|| {
            StreamingMacd::new(
                config.macd_fast,
                config.macd_slow,
                config.macd_signal,
                config.ema_seed,
            )
        });
        Self {
            thresholds: config.thresholds(),
            trend: StreamingEma::with_seed(config.trend_period, config.ema_seed),
            stochastic: StreamingStochastic::new(config.k_period, config.d_period),
            macd,
            prev: None,
            last_row: None,
            bars_processed: 0,
            signals_generated: 0,
            config,
        }
    }

    pub fn config(&self) -> &StochasticConfig {
        &self.config
    }

    /// Annotate every bar with indicator values and signals.
    ///
    /// Runs a fresh copy of the strategy, so `self` is left untouched and
    /// the result matches feeding the same bars through `on_bar`.
    pub fn evaluate(&self, bars: &[Bar]) -> Vec<SignalRow> {
        let mut runner = Self::new(self.config.clone());
        bars.iter().map(|bar| runner.step(bar)).collect()
    }

    /// Advance all indicators by one bar and apply the signal rules.
    fn step(&mut self, bar: &Bar) -> SignalRow {
        self.bars_processed += 1;

        let ema = self.trend.update(bar.close);
        let current = self.stochastic.update(*bar);
        let macd = self.macd.as_mut().and_then(|m| m.update(bar.close));

        let signal = match (ema, current, self.prev) {
            (Some(ema), Some(current), Some(prev)) => {
                self.decide(bar.close, ema, current, prev, macd)
            }
            _ => None,
        };
        self.prev = current;

        let row = SignalRow {
            timestamp: bar.timestamp,
            close: bar.close,
            ema,
            k: self.stochastic.k(),
            d: current.map(|c| c.d),
            macd: macd.map(|m| m.macd),
            macd_signal: macd.map(|m| m.signal),
            zone: self.stochastic.k().map(|k| self.thresholds.classify(k)),
            signal,
        };
        self.last_row = Some(row.clone());
        row
    }

    fn decide(
        &self,
        close: f64,
        ema: f64,
        current: StochasticOutput,
        prev: StochasticOutput,
        macd: Option<MacdOutput>,
    ) -> Option<SignalType> {
        let zone = self.thresholds.classify(current.k);
        // Without MACD configured the filter always passes.
        let macd_agrees = |bullish: bool| match (&self.macd, macd) {
            (None, _) => true,
            (Some(_), Some(m)) if bullish => m.macd > m.signal,
            (Some(_), Some(m)) => m.macd < m.signal,
            (Some(_), None) => false,
        };

        let crossed_up = prev.k < prev.d && current.k > current.d;
        let crossed_down = prev.k > prev.d && current.k < current.d;

        if close > ema && zone == Zone::Oversold && crossed_up && macd_agrees(true) {
            Some(SignalType::Buy)
        } else if close < ema && zone == Zone::Overbought && crossed_down && macd_agrees(false) {
            Some(SignalType::Sell)
        } else {
            None
        }
    }

    fn classify_strength(&self, k: f64) -> SignalStrength {
        if self.thresholds.is_extreme(k) {
            SignalStrength::Strong
        } else {
            SignalStrength::Moderate
        }
    }

    fn calculate_confidence(&self, k: f64) -> f64 {
        let base: f64 = if self.thresholds.is_extreme(k) { 0.9 } else { 0.7 };
        if self.config.use_macd {
            (base + 0.05).min(1.0)
        } else {
            base
        }
    }

    fn create_signal(&self, symbol: &str, signal_type: SignalType, row: &SignalRow) -> Signal {
        let k = row.k.unwrap_or_default();
        let d = row.d.unwrap_or_default();

        let mut indicators: HashMap<String, f64> =
            [("k".to_string(), k), ("d".to_string(), d)].into_iter().collect();
        if let Some(ema) = row.ema {
            indicators.insert("ema".to_string(), ema);
        }
        if let (Some(macd), Some(signal)) = (row.macd, row.macd_signal) {
            indicators.insert("macd".to_string(), macd);
            indicators.insert("macd_signal".to_string(), signal);
        }

        let reason = match signal_type {
            SignalType::Buy => format!(
                "%K ({:.1}) crossed above %D ({:.1}) below oversold level ({:.1}) in uptrend",
                k, d, self.config.oversold
            ),
            _ => format!(
                "%K ({:.1}) crossed below %D ({:.1}) above overbought level ({:.1}) in downtrend",
                k, d, self.config.overbought
            ),
        };

        Signal {
            symbol: symbol.to_string(),
            signal_type,
            strength: self.classify_strength(k),
            price: row.close,
            timestamp: row.timestamp,
            confidence: self.calculate_confidence(k),
            metadata: SignalMetadata {
                strategy_name: self.name().to_string(),
                indicators,
                reason,
            },
        }
    }
}

impl Strategy for StochasticStrategy {
    fn name(&self) -> &str {
        if self.config.use_macd {
            "Stochastic + MACD"
        } else {
            "Stochastic"
        }
    }

    fn description(&self) -> &str {
        "Trades %K/%D crossovers in oversold/overbought zones along the trend EMA"
    }

    fn on_bar(&mut self, series: &BarSeries) -> Option<Signal> {
        let bar = *series.last()?;

        if let Some(last) = &self.last_row {
            if bar.timestamp <= last.timestamp {
                debug!(
                    timestamp = bar.timestamp,
                    last = last.timestamp,
                    "Ignoring bar that is not newer than the last processed bar"
                );
                return None;
            }
        }

        let row = self.step(&bar);
        let signal_type = row.signal?;
        self.signals_generated += 1;

        let signal = self.create_signal(&series.symbol, signal_type, &row);
        debug!(
            symbol = %signal.symbol,
            signal = %signal.signal_type,
            price = signal.price,
            k = ?row.k,
            d = ?row.d,
            "Stochastic signal"
        );
        Some(signal)
    }

    fn reset(&mut self) {
        self.trend.reset();
        self.stochastic.reset();
        if let Some(macd) = self.macd.as_mut() {
            macd.reset();
        }
        self.prev = None;
        self.last_row = None;
        self.bars_processed = 0;
        self.signals_generated = 0;
    }

    fn state(&self) -> StrategyState {
        let mut indicators = HashMap::new();
        if let Some(row) = &self.last_row {
            let values = [
                ("ema", row.ema),
                ("k", row.k),
                ("d", row.d),
                ("macd", row.macd),
                ("macd_signal", row.macd_signal),
            ];
            for (name, value) in values {
                if let Some(value) = value {
                    indicators.insert(name.to_string(), value);
                }
            }
        }

        StrategyState {
            name: self.name().to_string(),
            is_warmed_up: self.is_warmed_up(self.bars_processed),
            bars_processed: self.bars_processed,
            signals_generated: self.signals_generated,
            indicators,
            custom: serde_json::json!({
                "zone": self.last_row.as_ref().and_then(|r| r.zone),
                "overbought": self.config.overbought,
                "oversold": self.config.oversold,
                "use_macd": self.config.use_macd,
            }),
        }
    }

    fn warmup_period(&self) -> usize {
        // One extra bar: a crossover needs the previous %K/%D pair.
        let mut warmup = self.stochastic.period() + 1;
        warmup = warmup.max(self.trend.period());
        if let Some(macd) = &self.macd {
            warmup = warmup.max(macd.period());
        }
        warmup
    }

    fn symbols(&self) -> &[String] {
        &self.config.symbols
    }
}
