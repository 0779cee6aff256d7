//! Risk metrics CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;
use riskstat_config::load_config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Command-line flags win over the configured logging section
    let file_config = load_config(&cli.config).ok();
    let log_level = match (cli.log_level, &file_config) {
        (Some(level), _) => level.as_str().to_string(),
        (None, Some(config)) => config.logging.level.clone(),
        (None, None) => "info".to_string(),
    };
    let json_logs = cli.json_logs
        || file_config
            .as_ref()
            .is_some_and(|config| config.logging.format == "json");
    setup_logging(&log_level, json_logs);

    // Execute command
    match cli.command {
        Commands::Analyze(args) => cli::commands::analyze::run(args, &cli.config),
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config),
    }
}
