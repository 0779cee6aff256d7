//! Validate configuration command.

use anyhow::Result;
use riskstat_config::{load_config, to_toml};
use std::path::Path;

pub fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found, checking defaults and RISKSTAT__* overrides only");
    }

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Risk-free rate: {}", config.metrics.risk_free_rate);
            println!("Trading days/year: {}", config.metrics.trading_days_per_year);
            println!("Log scale: {}", config.metrics.log_scale);
            println!("Initial capital: {}", config.data.initial_capital);
            println!();
            println!("Effective settings:");
            println!("{}", to_toml(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
