//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{BarSeries, Signal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Snapshot of a strategy for monitoring and serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyState {
    /// Strategy name
    pub name: String,
    /// Whether the strategy has processed enough bars to generate signals
    pub is_warmed_up: bool,
    /// Number of bars processed
    pub bars_processed: usize,
    /// Number of signals generated
    pub signals_generated: usize,
    /// Current indicator values
    pub indicators: HashMap<String, f64>,
    /// Strategy-specific state
    pub custom: serde_json::Value,
}

/// Core strategy trait.
///
/// Strategies receive bar data one bar at a time and emit trading signals.
pub trait Strategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Process the newest bar of `series` and optionally generate a signal.
    ///
    /// Called once per new bar, in chronological order.
    fn on_bar(&mut self, series: &BarSeries) -> Option<Signal>;

    /// Reset the strategy state.
    fn reset(&mut self);

    /// Get the current strategy state for monitoring.
    fn state(&self) -> StrategyState;

    /// Number of bars needed before signals can be generated.
    fn warmup_period(&self) -> usize;

    /// Get the symbols this strategy trades.
    fn symbols(&self) -> &[String];

    /// Check if the strategy is warmed up (has enough data).
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }

    fn description(&self) -> &str {
        ""
    }
}
