//! Configuration management.
//!
//! Settings come from a TOML file, overridden by `STOCHASTIC__SECTION__KEY`
//! environment variables (e.g. `STOCHASTIC__STRATEGY__K_PERIOD=21`).

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "STOCHASTIC";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Load configuration if the file exists, otherwise fall back to defaults.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.is_file() {
        load_config(path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Render the default configuration as TOML.
pub fn default_config_toml() -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use stochastic_core::types::Timeframe;
    use stochastic_indicators::EmaSeed;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
[data]
path = "prices.csv"
symbol = "TATAMOTORS.NS"

[strategy]
k_period = 21
d_period = 5
ema_seed = "sma"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.data.symbol, "TATAMOTORS.NS");
        assert_eq!(config.data.timeframe, Timeframe::Daily);
        assert_eq!(config.strategy.k_period, 21);
        assert_eq!(config.strategy.d_period, 5);
        assert_eq!(config.strategy.trend_period, 200);
        assert_eq!(config.strategy.ema_seed, EmaSeed::Sma);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_toml_round_trips() {
        let text = default_config_toml().unwrap();
        assert!(text.contains("[strategy]"));

        let file = write_config(&text);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.strategy, AppConfig::default().strategy);
        assert_eq!(config.app.name, "stochastic");
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/definitely/not/here.toml");
        assert!(load_config(path).is_err());
        assert_eq!(
            load_config_or_default(path).unwrap().strategy.k_period,
            14
        );
    }

    #[test]
    fn test_json_format_flag() {
        let logging = LoggingConfig {
            format: "JSON".to_string(),
            ..Default::default()
        };
        assert!(logging.is_json());
        assert!(!LoggingConfig::default().is_json());
    }
}
