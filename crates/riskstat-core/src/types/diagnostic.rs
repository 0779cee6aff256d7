//! Non-fatal findings recorded during a computation run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal anomaly. The run continues; the named metric is reported as
/// undefined or the named row as adjusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A ratio's denominator (or its whole input) was degenerate.
    DegenerateInput {
        metric: String,
        reason: String,
    },
    /// A daily return at or below -100% was clamped before taking ln(1 + r).
    LogDomainAdjusted {
        date: NaiveDate,
        raw_return: f64,
    },
}

impl Diagnostic {
    pub fn degenerate(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        Diagnostic::DegenerateInput {
            metric: metric.into(),
            reason: reason.into(),
        }
    }

    /// Metric name this diagnostic refers to, if any.
    pub fn metric(&self) -> Option<&str> {
        match self {
            Diagnostic::DegenerateInput { metric, .. } => Some(metric),
            Diagnostic::LogDomainAdjusted { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DegenerateInput { metric, reason } => {
                write!(f, "{} undefined: {}", metric, reason)
            }
            Diagnostic::LogDomainAdjusted { date, raw_return } => {
                write!(f, "{}: return {:.4} clamped before log transform", date, raw_return)
            }
        }
    }
}
