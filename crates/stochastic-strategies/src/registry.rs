//! Strategy registry for selecting strategy variants by name.

use crate::{StochasticConfig, StochasticStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stochastic_core::{error::StrategyError, traits::Strategy, traits::StrategyConfig};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key used on the command line
    pub key: String,
    /// Display name
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Whether the variant forces MACD confirmation on
    pub requires_macd: bool,
}

impl StrategyInfo {
    /// Apply the variant's fixed settings on top of a base configuration.
    fn apply(&self, mut config: StochasticConfig) -> StochasticConfig {
        if self.requires_macd {
            config.use_macd = true;
        }
        config
    }
}

/// Registry for available strategy variants.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new registry with all built-in variants.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();

        strategies.insert(
            "stochastic".to_string(),
            StrategyInfo {
                key: "stochastic".to_string(),
                name: "Stochastic".to_string(),
                description: "%K/%D crossovers in oversold/overbought zones, filtered by the trend EMA"
                    .to_string(),
                requires_macd: false,
            },
        );

        strategies.insert(
            "stochastic_macd".to_string(),
            StrategyInfo {
                key: "stochastic_macd".to_string(),
                name: "Stochastic + MACD".to_string(),
                description: "Stochastic crossovers confirmed by the MACD line versus its signal line"
                    .to_string(),
                requires_macd: true,
            },
        );

        Self { strategies }
    }

    /// List all available strategies, ordered by key.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by key.
    pub fn get(&self, key: &str) -> Option<&StrategyInfo> {
        self.strategies.get(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.strategies.contains_key(key)
    }

    pub fn names(&self) -> Vec<&String> {
        self.strategies.keys().collect()
    }

    /// Resolve the effective configuration for a variant.
    pub fn resolve_config(
        &self,
        key: &str,
        config: StochasticConfig,
        symbols: Vec<String>,
    ) -> Result<StochasticConfig, StrategyError> {
        let info = self
            .get(key)
            .ok_or_else(|| StrategyError::NotFound(key.to_string()))?;
        let mut config = info.apply(config);
        if !symbols.is_empty() {
            config.symbols = symbols;
        }
        config.validate()?;
        Ok(config)
    }

    /// Create a strategy instance from a base configuration.
    pub fn create(
        &self,
        key: &str,
        config: StochasticConfig,
        symbols: Vec<String>,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let config = self.resolve_config(key, config, symbols)?;
        Ok(Box::new(StochasticStrategy::new(config)))
    }

    /// Create a strategy from a JSON configuration, e.g. loaded from a file.
    pub fn create_from_json(
        &self,
        key: &str,
        config: serde_json::Value,
        symbols: Vec<String>,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let config: StochasticConfig = serde_json::from_value(config)
            .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
        self.create(key, config, symbols)
    }

    /// Create a strategy with default configuration.
    pub fn create_default(
        &self,
        key: &str,
        symbols: Vec<String>,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        self.create(key, StochasticConfig::default(), symbols)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
