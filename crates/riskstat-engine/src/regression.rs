//! Regression of strategy returns on benchmark returns.

use statrs::statistics::Statistics;

use crate::aggregate::annualized_return;
use crate::risk::ZERO_TOLERANCE;

/// `Cov(strategy, benchmark) / Var(benchmark)` using sample moments.
///
/// `None` with fewer than two paired observations or a benchmark whose
/// variance is zero.
pub fn beta(strategy: &[f64], benchmark: &[f64]) -> Option<f64> {
    let n = strategy.len().min(benchmark.len());
    if n < 2 {
        return None;
    }
    let (strategy, benchmark) = (&strategy[..n], &benchmark[..n]);

    let variance = benchmark.variance();
    if !variance.is_finite() || variance <= ZERO_TOLERANCE * ZERO_TOLERANCE {
        return None;
    }
    Some(strategy.covariance(benchmark) / variance)
}

/// Daily regression intercept `mean(strategy) - beta * mean(benchmark)`,
/// compounded over a year of trading days.
pub fn alpha(strategy: &[f64], benchmark: &[f64], beta: f64, periods: f64) -> f64 {
    if strategy.is_empty() || benchmark.is_empty() {
        return 0.0;
    }
    let daily = strategy.mean() - beta * benchmark.mean();
    annualized_return(daily, 1, periods)
}

/// Average daily excess return, not annualized.
pub fn average_excess_return(excess_returns: &[f64]) -> f64 {
    if excess_returns.is_empty() {
        return 0.0;
    }
    excess_returns.mean()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAYS: f64 = 252.0;

    #[test]
    fn test_identical_series() {
        let returns = [0.01, -0.02, 0.03, 0.004, -0.011];
        let b = beta(&returns, &returns).unwrap();
        assert!((b - 1.0).abs() < 1e-12);
        assert!(alpha(&returns, &returns, b, DAYS).abs() < 1e-9);
    }

    #[test]
    fn test_leveraged_strategy_has_beta_two() {
        let benchmark = [0.01, -0.02, 0.015, 0.0, -0.005];
        let strategy: Vec<f64> = benchmark.iter().map(|r| 2.0 * r + 0.001).collect();

        let b = beta(&strategy, &benchmark).unwrap();
        assert!((b - 2.0).abs() < 1e-9);

        let a = alpha(&strategy, &benchmark, b, DAYS);
        assert!((a - (1.001f64.powf(DAYS) - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_flat_benchmark_has_no_beta() {
        let strategy = [0.01, -0.02, 0.03];
        let benchmark = [0.001, 0.001, 0.001];
        assert_eq!(beta(&strategy, &benchmark), None);
        assert_eq!(beta(&[0.01], &[0.02]), None);
    }

    #[test]
    fn test_average_excess_return() {
        let excess = [0.005, -0.01, 0.01];
        assert!((average_excess_return(&excess) - 0.0016666666666).abs() < 1e-12);
        assert_eq!(average_excess_return(&[]), 0.0);
    }
}
