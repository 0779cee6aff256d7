//! Analyze command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use riskstat_config::load_config;
use riskstat_core::{MetricsConfig, TradeRecord};
use riskstat_data::{load_series, load_trades};
use riskstat_engine::{realized_equity_curve, MetricsEngine, MetricsReport};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::cli::{AnalyzeArgs, OutputFormat};

pub fn run(args: AnalyzeArgs, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    let metrics_config = apply_overrides(config.metrics, &args);

    let benchmark = load_series(&args.benchmark)
        .with_context(|| format!("Failed to load benchmark {}", args.benchmark.display()))?;

    let trades: Vec<TradeRecord> = match &args.trades {
        Some(path) => load_trades(path)
            .with_context(|| format!("Failed to load trades {}", path.display()))?,
        None => Vec::new(),
    };

    let strategy = match &args.equity {
        Some(path) => load_series(path)
            .with_context(|| format!("Failed to load equity {}", path.display()))?,
        None => {
            if trades.is_empty() {
                anyhow::bail!("Trade blotter is empty; provide --equity or a non-empty --trades file");
            }
            let capital = match args.initial_capital {
                Some(capital) => Decimal::try_from(capital)
                    .with_context(|| format!("Invalid initial capital: {}", capital))?,
                None => config.data.initial_capital,
            };
            let calendar: Vec<NaiveDate> = benchmark.iter().map(|(date, _)| *date).collect();
            info!(%capital, fills = trades.len(), "Deriving strategy equity from realized P&L");
            realized_equity_curve(&trades, capital, &calendar)
        }
    };

    info!(
        strategy_points = strategy.len(),
        benchmark_points = benchmark.len(),
        trades = trades.len(),
        "Computing metrics"
    );

    let engine = MetricsEngine::new(metrics_config);
    let metrics = engine
        .compute(&strategy, &benchmark, &trades)
        .context("Failed to compute metrics")?;
    let report = MetricsReport::new(metrics_config, metrics);

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    if let Some(curves_path) = &args.curves {
        let file = File::create(curves_path)
            .with_context(|| format!("Failed to create {}", curves_path.display()))?;
        report
            .write_curves_csv(file)
            .with_context(|| format!("Failed to write {}", curves_path.display()))?;
        info!("Curves saved to {:?}", curves_path);
    }

    Ok(())
}

fn apply_overrides(mut config: MetricsConfig, args: &AnalyzeArgs) -> MetricsConfig {
    if let Some(rate) = args.risk_free_rate {
        config.risk_free_rate = rate;
    }
    if let Some(days) = args.trading_days {
        config.trading_days_per_year = days;
    }
    if let Some(log_scale) = args.log_scale {
        config.log_scale = log_scale;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn analyze_args(extra: &[&str]) -> AnalyzeArgs {
        let mut argv = vec!["riskstat", "analyze", "--benchmark", "b.csv", "--equity", "e.csv"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Analyze(args) => args,
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_log_scale_flag_overrides_config_both_ways() {
        let configured = MetricsConfig {
            log_scale: true,
            ..Default::default()
        };

        let config = apply_overrides(configured, &analyze_args(&["--log-scale", "false"]));
        assert!(!config.log_scale);

        let config = apply_overrides(MetricsConfig::default(), &analyze_args(&["--log-scale"]));
        assert!(config.log_scale);

        let config = apply_overrides(configured, &analyze_args(&[]));
        assert!(config.log_scale);
    }

    #[test]
    fn test_numeric_overrides() {
        let args = analyze_args(&["--risk-free-rate", "0.02", "--trading-days", "250"]);
        let config = apply_overrides(MetricsConfig::default(), &args);
        assert_eq!(config.risk_free_rate, 0.02);
        assert_eq!(config.trading_days_per_year, 250);
    }
}
