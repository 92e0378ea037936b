//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{Bar, Timeframe};
use async_trait::async_trait;

/// Trait for historical bar sources.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Load every bar available for `symbol`.
    ///
    /// Bars are returned ordered from oldest to newest.
    async fn load_bars(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
