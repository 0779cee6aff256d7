//! CLI definitions.

pub mod commands;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "riskstat")]
#[command(author, version, about = "Strategy-versus-benchmark risk and performance metrics")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute risk metrics for a strategy against a benchmark
    Analyze(AnalyzeArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
#[command(group(
    ArgGroup::new("strategy")
        .required(true)
        .multiple(true)
        .args(["equity", "trades"])
))]
pub struct AnalyzeArgs {
    /// Benchmark price CSV (date, close)
    #[arg(short, long)]
    pub benchmark: PathBuf,

    /// Strategy equity/NAV CSV (date, value)
    #[arg(short, long)]
    pub equity: Option<PathBuf>,

    /// Trade blotter CSV (date, side, quantity, price, commission)
    #[arg(short, long)]
    pub trades: Option<PathBuf>,

    /// Annual risk-free rate
    #[arg(long)]
    pub risk_free_rate: Option<f64>,

    /// Trading days per year
    #[arg(long)]
    pub trading_days: Option<u32>,

    /// Use log-compounded cumulative returns (`--log-scale false` forces linear)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub log_scale: Option<bool>,

    /// Starting equity when only trades are given
    #[arg(long)]
    pub initial_capital: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the JSON report to file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the cumulative return and drawdown curves to a CSV file
    #[arg(long)]
    pub curves: Option<PathBuf>,
}
