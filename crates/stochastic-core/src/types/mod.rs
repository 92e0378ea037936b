//! Core data types for the stochastic signal system.

mod ohlcv;
mod signal;
mod timeframe;

pub use ohlcv::{Bar, BarSeries};
pub use signal::{Signal, SignalMetadata, SignalStrength, SignalType};
pub use timeframe::Timeframe;
