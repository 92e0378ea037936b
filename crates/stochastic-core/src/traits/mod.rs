//! Core traits for the stochastic signal system.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::DataSource;
pub use indicator::{Indicator, MultiOutputIndicator, StreamingIndicator};
pub use strategy::{Strategy, StrategyConfig, StrategyState};
