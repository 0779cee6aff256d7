//! Metrics engine.

use chrono::NaiveDate;
use riskstat_core::{
    Diagnostic, MetricsConfig, MetricsError, ReturnSeries, RiskstatResult, TradeRecord,
};
use tracing::{debug, info, warn};

use crate::aggregate::{annualized_return, cumulative_return, excess_curve, total_return};
use crate::builder::build_return_series;
use crate::metrics::{CurvePoint, MetricsResult};
use crate::regression::{alpha, average_excess_return, beta};
use crate::risk::{
    annualized_volatility, downside_risk, drawdown_curve, excess_return_sharpe, information_ratio,
    max_drawdown, max_drawdown_from_wealth, sharpe_ratio, sortino_ratio,
};
use crate::statistics::{daily_win_rate, TradeStatistics};

/// Stateless metrics calculator.
///
/// Holds only its configuration; every call works on its own inputs, so one
/// engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Create a new metrics engine.
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Compute every metric from a strategy value series, a benchmark price
    /// series and the strategy's fills.
    ///
    /// Fails only when the configuration is unusable, an input is out of
    /// order, or the two series share no dates.
    pub fn compute(
        &self,
        strategy_values: &[(NaiveDate, f64)],
        benchmark_prices: &[(NaiveDate, f64)],
        trades: &[TradeRecord],
    ) -> RiskstatResult<MetricsResult> {
        self.config.validate().map_err(MetricsError::InvalidInput)?;
        let series = build_return_series(strategy_values, benchmark_prices)?;
        self.compute_series(&series, trades)
    }

    /// Compute every metric from an already aligned return series.
    pub fn compute_series(
        &self,
        series: &ReturnSeries,
        trades: &[TradeRecord],
    ) -> RiskstatResult<MetricsResult> {
        self.config.validate().map_err(MetricsError::InvalidInput)?;
        let (start_date, end_date) = match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(MetricsError::InvalidInput("empty return series".to_string())),
        };

        info!(
            %start_date,
            %end_date,
            days = series.len(),
            trades = trades.len(),
            "Computing metrics"
        );

        let periods = self.config.periods();
        let rf = self.config.risk_free_rate;
        let n = series.len();
        let dates = series.dates();
        let strategy = series.strategy_returns();
        let benchmark = series.benchmark_returns();
        let excess = series.excess_returns();
        let mut diagnostics = Vec::new();

        // Returns
        let total = total_return(&strategy);
        let annualized = annualized_return(total, n, periods);
        let benchmark_total = total_return(&benchmark);
        let benchmark_annualized = annualized_return(benchmark_total, n, periods);

        let curve = cumulative_return(&strategy, self.config.log_scale, self.config.log_epsilon);
        for &i in &curve.adjusted {
            diagnostics.push(Diagnostic::LogDomainAdjusted {
                date: dates[i],
                raw_return: strategy[i],
            });
        }

        let relative = excess_curve(&strategy, &benchmark);
        for &i in &relative.adjusted {
            diagnostics.push(Diagnostic::degenerate(
                "excess_return_curve",
                format!(
                    "benchmark return {:.4} on {} has no relative value, used the difference",
                    benchmark[i], dates[i]
                ),
            ));
        }
        let excess_total_return = relative.values.last().copied().unwrap_or(0.0);
        let relative_wealth: Vec<f64> = relative.values.iter().map(|v| 1.0 + v).collect();

        // Risk
        let algorithm_volatility = annualized_volatility(&strategy, periods);
        let benchmark_volatility = annualized_volatility(&benchmark, periods);
        let downside = downside_risk(&strategy, periods);

        let sharpe = undefined_if_none(
            sharpe_ratio(annualized, rf, algorithm_volatility),
            "sharpe",
            "strategy volatility is zero",
            &mut diagnostics,
        );
        let sortino = undefined_if_none(
            sortino_ratio(annualized, rf, downside),
            "sortino",
            "fewer than two negative daily returns, downside risk is zero",
            &mut diagnostics,
        );
        let information_ratio = undefined_if_none(
            information_ratio(&excess, periods),
            "information_ratio",
            "excess return volatility is zero",
            &mut diagnostics,
        );
        let excess_return_sharpe = undefined_if_none(
            excess_return_sharpe(&excess, periods),
            "excess_return_sharpe",
            "excess return volatility is zero",
            &mut diagnostics,
        );

        // Regression
        let beta = undefined_if_none(
            beta(&strategy, &benchmark),
            "beta",
            "benchmark variance is zero",
            &mut diagnostics,
        );
        let alpha = undefined_if_none(
            beta.map(|b| alpha(&strategy, &benchmark, b, periods)),
            "alpha",
            "beta is undefined",
            &mut diagnostics,
        );
        let aei = average_excess_return(&excess);

        // Trades
        let trade_stats = TradeStatistics::from_trades(trades);
        let win_rate = undefined_if_none(
            trade_stats.win_rate(),
            "win_rate",
            "no closed trades",
            &mut diagnostics,
        );
        let profit_loss_ratio = undefined_if_none(
            trade_stats.profit_loss_ratio(),
            "profit_loss_ratio",
            "needs at least one winning and one losing trade",
            &mut diagnostics,
        );
        let daily_win_rate = daily_win_rate(&strategy).unwrap_or(0.0);

        for diagnostic in &diagnostics {
            warn!(%diagnostic, "Metric diagnostic");
        }

        let result = MetricsResult {
            start_date,
            end_date,
            trading_days: n,
            total_return: total,
            annualized_return: annualized,
            benchmark_total_return: benchmark_total,
            benchmark_annualized_return: benchmark_annualized,
            excess_total_return,
            alpha,
            aei,
            beta,
            sharpe,
            sortino,
            information_ratio,
            algorithm_volatility,
            benchmark_volatility,
            max_drawdown: max_drawdown(&strategy),
            downside_risk: downside,
            excess_return_max_drawdown: max_drawdown_from_wealth(&relative_wealth),
            excess_return_sharpe,
            win_rate,
            daily_win_rate,
            profit_loss_ratio,
            total_trades: trade_stats.total_trades(),
            winning_trades: trade_stats.winning_trades,
            losing_trades: trade_stats.losing_trades,
            breakeven_trades: trade_stats.breakeven_trades(),
            log_scale: self.config.log_scale,
            cumulative_return_curve: to_curve(&dates, curve.values),
            drawdown_curve: to_curve(&dates, drawdown_curve(&strategy)),
            excess_return_curve: to_curve(&dates, relative.values),
            benchmark_drawdown_curve: to_curve(&dates, drawdown_curve(&benchmark)),
            diagnostics,
        };

        debug!(
            total_return = result.total_return,
            max_drawdown = result.max_drawdown,
            undefined = result.undefined_metrics().len(),
            "Metrics computed"
        );

        Ok(result)
    }
}

fn undefined_if_none(
    value: Option<f64>,
    metric: &str,
    reason: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<f64> {
    if value.is_none() {
        diagnostics.push(Diagnostic::degenerate(metric, reason));
    }
    value
}

fn to_curve(dates: &[NaiveDate], values: Vec<f64>) -> Vec<CurvePoint> {
    dates
        .iter()
        .zip(values)
        .map(|(&date, value)| CurvePoint { date, value })
        .collect()
}
