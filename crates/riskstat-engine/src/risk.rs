//! Volatility, drawdown and risk-adjusted return ratios.
//!
//! Ratios whose denominator is zero (or too small to be distinguished from
//! zero) return `None`; the engine turns that into an undefined metric plus a
//! diagnostic.

use statrs::statistics::Statistics;

use crate::aggregate::{annualized_return, total_return, wealth_curve};

/// Denominators at or below this are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-12;

/// Sample standard deviation (n - 1 denominator); 0 with fewer than two
/// observations.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.std_dev()
}

/// `sample_std(daily) * sqrt(periods)`.
pub fn annualized_volatility(returns: &[f64], periods: f64) -> f64 {
    sample_std(returns) * periods.sqrt()
}

/// Annualized standard deviation of the negative daily returns only.
///
/// Zero when fewer than two negative returns exist.
pub fn downside_risk(returns: &[f64], periods: f64) -> f64 {
    let negative: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    annualized_volatility(&negative, periods)
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.abs() <= ZERO_TOLERANCE || !denominator.is_finite() {
        return None;
    }
    Some(numerator / denominator)
}

/// `(annualized_return - risk_free_rate) / volatility`.
pub fn sharpe_ratio(annualized_return: f64, risk_free_rate: f64, volatility: f64) -> Option<f64> {
    ratio(annualized_return - risk_free_rate, volatility)
}

/// `(annualized_return - risk_free_rate) / downside_risk`.
pub fn sortino_ratio(annualized_return: f64, risk_free_rate: f64, downside_risk: f64) -> Option<f64> {
    ratio(annualized_return - risk_free_rate, downside_risk)
}

/// Annualized mean excess return over annualized tracking error.
pub fn information_ratio(excess_returns: &[f64], periods: f64) -> Option<f64> {
    if excess_returns.is_empty() {
        return None;
    }
    let mean = excess_returns.mean();
    ratio(mean * periods, annualized_volatility(excess_returns, periods))
}

/// Annualized compounded excess return over annualized tracking error.
///
/// The excess series already nets out the benchmark, so no risk-free rate is
/// subtracted.
pub fn excess_return_sharpe(excess_returns: &[f64], periods: f64) -> Option<f64> {
    let annualized = annualized_return(total_return(excess_returns), excess_returns.len(), periods);
    ratio(annualized, annualized_volatility(excess_returns, periods))
}

/// Fractional decline from the running peak of a wealth curve.
///
/// The initial peak is the starting value of 1, so a first value below 1 is
/// already a drawdown.
pub fn drawdown_from_wealth(wealth: &[f64]) -> Vec<f64> {
    let mut peak = 1.0_f64;

    wealth
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            (peak - value) / peak
        })
        .collect()
}

/// Largest value of [`drawdown_from_wealth`]; 0 for an empty or never-falling curve.
pub fn max_drawdown_from_wealth(wealth: &[f64]) -> f64 {
    drawdown_from_wealth(wealth).into_iter().fold(0.0, f64::max)
}

/// Drawdown after each day of compounding `returns` from a starting value of 1.
pub fn drawdown_curve(returns: &[f64]) -> Vec<f64> {
    drawdown_from_wealth(&wealth_curve(returns))
}

/// Largest value of [`drawdown_curve`].
pub fn max_drawdown(returns: &[f64]) -> f64 {
    max_drawdown_from_wealth(&wealth_curve(returns))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAYS: f64 = 252.0;

    #[test]
    fn test_volatility_uses_sample_std() {
        let returns = [0.01, -0.01, 0.01, -0.01];
        // mean 0, sum of squares 4e-4, n - 1 = 3
        let expected = (4e-4_f64 / 3.0).sqrt() * DAYS.sqrt();
        assert!((annualized_volatility(&returns, DAYS) - expected).abs() < 1e-12);
        assert_eq!(annualized_volatility(&[0.01], DAYS), 0.0);
    }

    #[test]
    fn test_downside_without_losses_is_zero() {
        let returns = [0.01, 0.02, 0.0];
        assert_eq!(downside_risk(&returns, DAYS), 0.0);
        assert_eq!(sortino_ratio(0.1, 0.04, 0.0), None);
    }

    #[test]
    fn test_all_negative_returns() {
        let returns = [-0.01, -0.02, -0.005, -0.015];
        let downside = downside_risk(&returns, DAYS);
        assert!(downside > 0.0);

        let annualized = annualized_return(total_return(&returns), returns.len(), DAYS);
        let sortino = sortino_ratio(annualized, 0.04, downside).unwrap();
        assert!(sortino.is_finite());
        assert!(sortino < 0.0);

        let curve = drawdown_curve(&returns);
        assert!(max_drawdown(&returns) > 0.0);
        // Peak never moves off the starting value, so drawdown only deepens
        assert!(curve.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_max_drawdown_matches_peak_to_trough() {
        let returns = [0.10, -0.20, 0.05, 0.30, -0.10];
        // Wealth: 1.1, 0.88, 0.924, 1.2012, 1.08108
        let dd = max_drawdown(&returns);
        assert!((dd - 0.2).abs() < 1e-12);
        assert!(drawdown_curve(&returns)[3].abs() < 1e-12);
    }

    #[test]
    fn test_max_drawdown_zero_iff_never_falls() {
        assert_eq!(max_drawdown(&[0.01, 0.0, 0.02]), 0.0);
        assert!(max_drawdown(&[0.01, -0.0001, 0.02]) > 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_drawdown_on_relative_wealth() {
        // Strategy wealth 1.2, 1.2 against benchmark 1.0, 1.2
        let relative = [1.2, 1.0];
        let dd = max_drawdown_from_wealth(&relative);
        assert!((dd - 1.0 / 6.0).abs() < 1e-12);
        // Starting value of 1 is the first peak
        assert!((drawdown_from_wealth(&[0.9])[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_ratios_scale_consistently() {
        let (ret, rf, vol, downside) = (0.12, 0.04, 0.2, 0.15);
        let k = 3.5;

        let sharpe = sharpe_ratio(ret, rf, vol).unwrap();
        let scaled = sharpe_ratio(ret * k, rf * k, vol * k).unwrap();
        assert!((sharpe - scaled).abs() < 1e-12);

        let sortino = sortino_ratio(ret, rf, downside).unwrap();
        let scaled = sortino_ratio(ret * k, rf * k, downside * k).unwrap();
        assert!((sortino - scaled).abs() < 1e-12);
    }

    #[test]
    fn test_zero_volatility_sharpe_is_undefined() {
        assert_eq!(sharpe_ratio(0.1, 0.04, 0.0), None);
    }

    #[test]
    fn test_information_ratio() {
        let excess = [0.005, -0.01, 0.01];
        let mean = 0.005 / 3.0;
        let expected = mean * DAYS / (sample_std(&excess) * DAYS.sqrt());
        assert!((information_ratio(&excess, DAYS).unwrap() - expected).abs() < 1e-12);

        assert_eq!(information_ratio(&[0.0, 0.0, 0.0], DAYS), None);
        assert_eq!(information_ratio(&[], DAYS), None);
    }

    #[test]
    fn test_excess_return_sharpe_has_no_risk_free_leg() {
        let excess = [0.002, -0.001, 0.003, 0.0];
        let annualized = annualized_return(total_return(&excess), excess.len(), DAYS);
        let expected = annualized / annualized_volatility(&excess, DAYS);
        assert!((excess_return_sharpe(&excess, DAYS).unwrap() - expected).abs() < 1e-12);
    }
}
