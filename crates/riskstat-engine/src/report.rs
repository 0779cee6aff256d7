//! Metrics report generation.

use chrono::NaiveDate;
use riskstat_core::MetricsConfig;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::MetricsResult;

/// Complete metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Configuration used
    pub config: MetricsConfig,
    /// Computed metrics
    pub metrics: MetricsResult,
}

/// One row of the exported curves.
#[derive(Debug, Serialize)]
struct CurveRow {
    date: NaiveDate,
    cumulative_return: f64,
    drawdown: f64,
    excess_return: f64,
    benchmark_drawdown: f64,
}

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

fn num(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "n/a".to_string(),
    }
}

fn line(s: &mut String, label: &str, value: String) {
    s.push_str(&format!("  {:<28}{}\n", format!("{}:", label), value));
}

impl MetricsReport {
    pub fn new(config: MetricsConfig, metrics: MetricsResult) -> Self {
        Self { config, metrics }
    }

    /// Generate a text summary. Undefined metrics print as `n/a`.
    pub fn summary(&self) -> String {
        let m = &self.metrics;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                   RISK METRICS REPORT                      \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!(
            "  Period: {} to {} ({} trading days)\n",
            m.start_date, m.end_date, m.trading_days
        ));
        s.push_str(&format!(
            "  Risk-free rate: {:.2}%   Trading days/year: {}\n\n",
            self.config.risk_free_rate * 100.0,
            self.config.trading_days_per_year
        ));

        s.push_str("RETURNS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        line(&mut s, "Total Return", pct(Some(m.total_return)));
        line(&mut s, "Annualized Return", pct(Some(m.annualized_return)));
        line(&mut s, "Benchmark Return", pct(Some(m.benchmark_total_return)));
        line(&mut s, "Benchmark Annualized", pct(Some(m.benchmark_annualized_return)));
        line(&mut s, "Excess Return", pct(Some(m.excess_total_return)));
        line(&mut s, "Alpha", pct(m.alpha));
        line(&mut s, "AEI (daily)", pct(Some(m.aei)));
        s.push('\n');

        s.push_str("RISK METRICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        line(&mut s, "Beta", num(m.beta));
        line(&mut s, "Sharpe Ratio", num(m.sharpe));
        line(&mut s, "Sortino Ratio", num(m.sortino));
        line(&mut s, "Information Ratio", num(m.information_ratio));
        line(&mut s, "Algorithm Volatility", pct(Some(m.algorithm_volatility)));
        line(&mut s, "Benchmark Volatility", pct(Some(m.benchmark_volatility)));
        line(&mut s, "Max Drawdown", pct(Some(m.max_drawdown)));
        line(&mut s, "Downside Risk", pct(Some(m.downside_risk)));
        line(&mut s, "Excess Max Drawdown", pct(Some(m.excess_return_max_drawdown)));
        line(&mut s, "Excess Return Sharpe", num(m.excess_return_sharpe));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        line(&mut s, "Closed Trades", m.total_trades.to_string());
        line(&mut s, "Winning Trades", m.winning_trades.to_string());
        line(&mut s, "Losing Trades", m.losing_trades.to_string());
        line(&mut s, "Breakeven Trades", m.breakeven_trades.to_string());
        line(&mut s, "Win Rate", pct(m.win_rate));
        line(&mut s, "Daily Win Rate", pct(Some(m.daily_win_rate)));
        line(&mut s, "Profit/Loss Ratio", num(m.profit_loss_ratio));
        s.push('\n');

        if !m.diagnostics.is_empty() {
            s.push_str("DIAGNOSTICS\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            for diagnostic in &m.diagnostics {
                s.push_str(&format!("  - {}\n", diagnostic));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the daily curves as CSV: cumulative return, drawdown, excess
    /// return and benchmark drawdown.
    pub fn write_curves_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let m = &self.metrics;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        let cumulative_header = if m.log_scale {
            "log_cumulative_return"
        } else {
            "cumulative_return"
        };
        writer.write_record([
            "date",
            cumulative_header,
            "drawdown",
            "excess_return",
            "benchmark_drawdown",
        ])?;

        let rows = m
            .cumulative_return_curve
            .iter()
            .zip(&m.drawdown_curve)
            .zip(&m.excess_return_curve)
            .zip(&m.benchmark_drawdown_curve);
        for (((cumulative, drawdown), excess), benchmark_drawdown) in rows {
            writer.serialize(CurveRow {
                date: cumulative.date,
                cumulative_return: cumulative.value,
                drawdown: drawdown.value,
                excess_return: excess.value,
                benchmark_drawdown: benchmark_drawdown.value,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsEngine;
    use chrono::NaiveDate;
    use riskstat_core::ReturnSeries;

    fn report() -> MetricsReport {
        let d = |n| NaiveDate::from_ymd_opt(2024, 7, n).unwrap();
        let strategy = vec![(d(1), 0.01), (d(2), -0.02), (d(3), 0.03)];
        let benchmark = vec![(d(1), 0.005), (d(2), -0.01), (d(3), 0.02)];
        let series = ReturnSeries::from_returns(&strategy, &benchmark).unwrap();

        let config = MetricsConfig::default();
        let metrics = MetricsEngine::new(config).compute_series(&series, &[]).unwrap();
        MetricsReport::new(config, metrics)
    }

    #[test]
    fn test_report_summary() {
        let summary = report().summary();
        assert!(summary.contains("Total Return"));
        assert!(summary.contains("1.9494%"));
        // No fills, so trade ratios are undefined
        assert!(summary.contains("Win Rate:                   n/a"));
        assert!(summary.contains("DIAGNOSTICS"));
    }

    #[test]
    fn test_json_marks_undefined_as_null() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["metrics"]["win_rate"].is_null());
        assert!(value["metrics"]["beta"].is_number());
    }

    #[test]
    fn test_summary_shows_excess_and_breakeven() {
        let summary = report().summary();
        assert!(summary.contains("Excess Return:"));
        assert!(summary.contains("Breakeven Trades:           0"));
    }

    #[test]
    fn test_write_curves_csv() {
        let mut buffer = Vec::new();
        report().write_curves_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "date,cumulative_return,drawdown,excess_return,benchmark_drawdown"
        );
        assert!(lines[1].starts_with("2024-07-01,"));
        assert_eq!(lines[1].split(',').count(), 5);
    }
}
