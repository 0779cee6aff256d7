//! Risk and performance metrics engine.
//!
//! Turns a strategy value series, a benchmark price series and the strategy's
//! fills into a [`MetricsResult`]: returns, alpha/beta, Sharpe, Sortino,
//! information ratio, volatilities, drawdowns and trade statistics.

pub mod aggregate;
pub mod builder;
pub mod regression;
pub mod risk;
mod engine;
mod metrics;
mod report;
mod statistics;

pub use builder::{build_return_series, pct_change};
pub use engine::MetricsEngine;
pub use metrics::{CurvePoint, MetricsResult};
pub use report::MetricsReport;
pub use statistics::{daily_win_rate, realized_equity_curve, realized_pnl_by_date, TradeStatistics};
