//! Stochastic oscillator trading strategy.
//!
//! - `StochasticStrategy`: %K/%D crossovers in the extreme zones, filtered
//!   by a trend EMA and optionally by MACD
//! - `StrategyRegistry`: named strategy variants

mod registry;
mod stochastic_strategy;

pub use registry::{StrategyInfo, StrategyRegistry};
pub use stochastic_strategy::{SignalRow, StochasticConfig, StochasticStrategy};
