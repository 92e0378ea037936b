//! Technical indicators for stochastic signal generation.
//!
//! - Moving averages (SMA, EMA with selectable seeding)
//! - Momentum indicators (Stochastic %K/%D, MACD)
//! - Zone classification against overbought/oversold thresholds
//!
//! Every indicator has a batch form (whole slice in, series out) and a
//! streaming form updated one bar at a time.

pub mod momentum;
pub mod moving_average;
pub mod zones;

pub use momentum::{
    percent_k, Macd, MacdOutput, Stochastic, StochasticOutput, StreamingMacd,
    StreamingStochastic, DEGENERATE_K,
};
pub use moving_average::{Ema, EmaSeed, Sma, StreamingEma, StreamingSma};
pub use zones::{Thresholds, Zone};
