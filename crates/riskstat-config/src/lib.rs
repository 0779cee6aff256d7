//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// The file is optional; every section falls back to its defaults. Variables
/// such as `RISKSTAT__METRICS__RISK_FREE_RATE=0.03` override file values.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("RISKSTAT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.metrics.validate().map_err(ConfigError::Message)?;
    Ok(app)
}

/// Render a configuration as TOML (used to print the effective settings).
pub fn to_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}
