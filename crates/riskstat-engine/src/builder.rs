//! Return series construction.

use chrono::NaiveDate;
use riskstat_core::{check_ascending, ReturnSeries, RiskstatResult};
use tracing::{debug, warn};

/// Day-over-day percentage change of a date-indexed value series.
///
/// The first point has no prior value and produces no return. A point whose
/// prior value is zero, or whose change is not finite, is skipped.
pub fn pct_change(series: &'static str, values: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, f64)> {
    let mut returns = Vec::with_capacity(values.len().saturating_sub(1));

    for pair in values.windows(2) {
        let (_, prev) = pair[0];
        let (date, value) = pair[1];
        let ret = (value - prev) / prev;

        if prev == 0.0 || !ret.is_finite() {
            warn!(series, %date, prev, value, "Skipping day without a defined return");
            continue;
        }
        returns.push((date, ret));
    }

    returns
}

/// Build an aligned [`ReturnSeries`] from a strategy value series (equity,
/// NAV or position value) and a benchmark price series.
///
/// Both inputs must be strictly date-ascending. Only dates with a return in
/// both series survive.
pub fn build_return_series(
    strategy_values: &[(NaiveDate, f64)],
    benchmark_prices: &[(NaiveDate, f64)],
) -> RiskstatResult<ReturnSeries> {
    check_ascending("strategy", strategy_values)?;
    check_ascending("benchmark", benchmark_prices)?;

    let strategy = pct_change("strategy", strategy_values);
    let benchmark = pct_change("benchmark", benchmark_prices);
    let series = ReturnSeries::from_returns(&strategy, &benchmark)?;

    debug!(
        strategy_days = strategy.len(),
        benchmark_days = benchmark.len(),
        aligned_days = series.len(),
        "Aligned return series"
    );

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskstat_core::MetricsError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_pct_change_drops_first_point() {
        let values = vec![(day(1), 100.0), (day(2), 110.0), (day(3), 99.0)];
        let returns = pct_change("test", &values);

        assert_eq!(returns.len(), 2);
        assert_eq!(returns[0].0, day(2));
        assert!((returns[0].1 - 0.10).abs() < 1e-12);
        assert!((returns[1].1 - -0.10).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change_skips_zero_prior() {
        let values = vec![(day(1), 0.0), (day(2), 10.0), (day(3), 11.0)];
        let returns = pct_change("test", &values);

        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].0, day(3));
    }

    #[test]
    fn test_build_aligns_on_common_dates() {
        let strategy = vec![(day(1), 100.0), (day(2), 101.0), (day(3), 98.98), (day(6), 101.0)];
        let benchmark = vec![(day(1), 50.0), (day(2), 50.25), (day(3), 49.7475), (day(7), 51.0)];

        let series = build_return_series(&strategy, &benchmark).unwrap();
        assert_eq!(series.dates(), vec![day(2), day(3)]);

        let row = series.rows()[1];
        assert!((row.strategy_return - -0.02).abs() < 1e-9);
        assert!((row.benchmark_return - -0.01).abs() < 1e-9);
        assert!((row.excess_return - -0.01).abs() < 1e-9);
    }

    #[test]
    fn test_build_fails_without_overlap() {
        let strategy = vec![(day(1), 100.0), (day(2), 101.0)];
        let benchmark = vec![(day(3), 50.0), (day(4), 51.0)];

        let err = build_return_series(&strategy, &benchmark).unwrap_err();
        assert!(matches!(err, MetricsError::Alignment { .. }));
    }

    #[test]
    fn test_single_point_series_cannot_align() {
        let strategy = vec![(day(1), 100.0)];
        let benchmark = vec![(day(1), 50.0), (day(2), 51.0)];

        assert!(build_return_series(&strategy, &benchmark).is_err());
    }
}
