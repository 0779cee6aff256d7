//! Return compounding and annualization.

/// A cumulative return curve and the rows whose input had to be clamped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CumulativeCurve {
    /// One value per input return
    pub values: Vec<f64>,
    /// Indices of returns at or below -100% that were floored at
    /// `log_epsilon` before taking the log (log mode only)
    pub adjusted: Vec<usize>,
}

/// Cumulative return after each day.
///
/// Linear mode is the running product of `(1 + r)` minus one. Log mode is the
/// running sum of `ln(1 + r)`; where `1 + r <= 0` the growth factor is
/// replaced by `log_epsilon` and the row index is recorded.
pub fn cumulative_return(returns: &[f64], log_scale: bool, log_epsilon: f64) -> CumulativeCurve {
    if !log_scale {
        return CumulativeCurve {
            values: wealth_curve(returns).into_iter().map(|w| w - 1.0).collect(),
            adjusted: Vec::new(),
        };
    }

    let mut adjusted = Vec::new();
    let mut sum = 0.0;
    let values = returns
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut growth = 1.0 + r;
            if growth <= 0.0 {
                growth = log_epsilon;
                adjusted.push(i);
            }
            sum += growth.ln();
            sum
        })
        .collect();

    CumulativeCurve { values, adjusted }
}

/// Cumulative excess return of strategy wealth over benchmark wealth.
///
/// Each day the relative value grows by `(1 + s) / (1 + b)`, so after day `t`
/// it equals `wealth(strategy)[t] / wealth(benchmark)[t]`; the curve is that
/// value minus one. Where `1 + b <= 0` the ratio is undefined; the day grows
/// by `1 + (s - b)` instead and its index is recorded.
pub fn excess_curve(strategy: &[f64], benchmark: &[f64]) -> CumulativeCurve {
    let mut adjusted = Vec::new();
    let mut relative = 1.0;
    let values = strategy
        .iter()
        .zip(benchmark)
        .enumerate()
        .map(|(i, (s, b))| {
            let benchmark_growth = 1.0 + b;
            if benchmark_growth <= 0.0 {
                relative *= 1.0 + (s - b);
                adjusted.push(i);
            } else {
                relative *= (1.0 + s) / benchmark_growth;
            }
            relative - 1.0
        })
        .collect();

    CumulativeCurve { values, adjusted }
}

/// Compounded value of one unit after each day.
pub fn wealth_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |wealth, r| {
            *wealth *= 1.0 + r;
            Some(*wealth)
        })
        .collect()
}

/// Compounded return over the whole series; 0 for an empty series.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// `(1 + total_return)^(trading_days_per_year / n_days) - 1`.
///
/// Returns 0 when `n_days` is 0, and -1 when the total return is a loss of
/// 100% or more (a fractional power of a non-positive base is undefined).
pub fn annualized_return(total_return: f64, n_days: usize, trading_days_per_year: f64) -> f64 {
    if n_days == 0 {
        return 0.0;
    }
    let growth = 1.0 + total_return;
    if growth <= 0.0 {
        return -1.0;
    }
    growth.powf(trading_days_per_year / n_days as f64) - 1.0
}
