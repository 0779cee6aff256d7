//! Computation configuration.

use serde::{Deserialize, Serialize};

/// Parameters shared by every metric of one computation run.
///
/// Passed by value into the engine; nothing reads a process-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Annualized risk-free rate as a fraction (0.04 = 4%)
    pub risk_free_rate: f64,
    /// Trading days used to annualize daily figures
    pub trading_days_per_year: u32,
    /// Render the cumulative return curve as a running sum of ln(1 + r)
    pub log_scale: bool,
    /// Floor substituted for 1 + r when it is not positive under a log transform
    pub log_epsilon: f64,
}

impl MetricsConfig {
    pub const DEFAULT_RISK_FREE_RATE: f64 = 0.04;
    pub const DEFAULT_TRADING_DAYS: u32 = 252;
    pub const DEFAULT_LOG_EPSILON: f64 = 1e-8;

    /// Trading days per year as a float.
    pub fn periods(&self) -> f64 {
        f64::from(self.trading_days_per_year)
    }

    /// Check the configuration for values no metric can work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.trading_days_per_year == 0 {
            return Err("trading_days_per_year must be greater than 0".to_string());
        }
        if !self.risk_free_rate.is_finite() {
            return Err("risk_free_rate must be finite".to_string());
        }
        if !(self.log_epsilon > 0.0 && self.log_epsilon < 1.0) {
            return Err("log_epsilon must be in (0, 1)".to_string());
        }
        Ok(())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: Self::DEFAULT_RISK_FREE_RATE,
            trading_days_per_year: Self::DEFAULT_TRADING_DAYS,
            log_scale: false,
            log_epsilon: Self::DEFAULT_LOG_EPSILON,
        }
    }
}
