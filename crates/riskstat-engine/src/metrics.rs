//! The computed metric record.

use chrono::NaiveDate;
use riskstat_core::Diagnostic;
use serde::{Deserialize, Serialize};

/// A single point of a date-indexed output curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Output of one computation run.
///
/// Ratios that can have a zero denominator are `Option`s: `None` means the
/// metric is undefined for this input and a matching entry exists in
/// `diagnostics`. Returns, volatilities and drawdowns are fractions
/// (0.05 = 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// First aligned trading day
    pub start_date: NaiveDate,
    /// Last aligned trading day
    pub end_date: NaiveDate,
    /// Number of aligned trading days
    pub trading_days: usize,

    // Returns
    pub total_return: f64,
    pub annualized_return: f64,
    pub benchmark_total_return: f64,
    pub benchmark_annualized_return: f64,
    /// Annualized regression intercept
    pub alpha: Option<f64>,
    /// `(1 + total_return) / (1 + benchmark_total_return) - 1`
    pub excess_total_return: f64,
    /// Average daily excess return (not annualized)
    pub aei: f64,

    // Risk
    pub beta: Option<f64>,
    pub sharpe: Option<f64>,
    pub sortino: Option<f64>,
    pub information_ratio: Option<f64>,
    pub algorithm_volatility: f64,
    pub benchmark_volatility: f64,
    pub max_drawdown: f64,
    pub downside_risk: f64,
    pub excess_return_max_drawdown: f64,
    pub excess_return_sharpe: Option<f64>,

    // Trades
    pub win_rate: Option<f64>,
    pub daily_win_rate: f64,
    pub profit_loss_ratio: Option<f64>,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,

    /// Whether `cumulative_return_curve` holds log returns
    pub log_scale: bool,
    pub cumulative_return_curve: Vec<CurvePoint>,
    pub drawdown_curve: Vec<CurvePoint>,
    /// Strategy wealth over benchmark wealth, minus one
    pub excess_return_curve: Vec<CurvePoint>,
    pub benchmark_drawdown_curve: Vec<CurvePoint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MetricsResult {
    /// All scalar metrics by name, undefined ones as `None`.
    pub fn scalars(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("total_return", Some(self.total_return)),
            ("annualized_return", Some(self.annualized_return)),
            ("benchmark_total_return", Some(self.benchmark_total_return)),
            ("benchmark_annualized_return", Some(self.benchmark_annualized_return)),
            ("excess_total_return", Some(self.excess_total_return)),
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("sharpe", self.sharpe),
            ("sortino", self.sortino),
            ("information_ratio", self.information_ratio),
            ("algorithm_volatility", Some(self.algorithm_volatility)),
            ("benchmark_volatility", Some(self.benchmark_volatility)),
            ("max_drawdown", Some(self.max_drawdown)),
            ("downside_risk", Some(self.downside_risk)),
            ("win_rate", self.win_rate),
            ("daily_win_rate", Some(self.daily_win_rate)),
            ("profit_loss_ratio", self.profit_loss_ratio),
            ("aei", Some(self.aei)),
            ("excess_return_max_drawdown", Some(self.excess_return_max_drawdown)),
            ("excess_return_sharpe", self.excess_return_sharpe),
        ]
    }

    /// Names of metrics that could not be computed.
    pub fn undefined_metrics(&self) -> Vec<&'static str> {
        self.scalars()
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect()
    }
}
