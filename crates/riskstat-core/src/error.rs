//! Error types for the risk metrics system.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a metrics computation run.
///
/// Degenerate inputs (zero variance, no losing trades, clamped log inputs)
/// are not errors; they surface as [`crate::Diagnostic`]s next to an
/// undefined metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error(
        "Alignment error: strategy ({strategy_days} days) and benchmark ({benchmark_days} days) share no dates"
    )]
    Alignment {
        strategy_days: usize,
        benchmark_days: usize,
    },

    #[error("Dates must be strictly ascending in {series}: {date} follows {previous}")]
    UnorderedDates {
        series: &'static str,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Data loading errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("No rows in {0}")]
    Empty(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type alias for metrics operations.
pub type RiskstatResult<T> = Result<T, MetricsError>;
