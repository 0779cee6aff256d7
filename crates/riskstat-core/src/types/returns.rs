//! Aligned daily return series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{MetricsError, RiskstatResult};

/// One trading day present in both the strategy and benchmark data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub strategy_return: f64,
    pub benchmark_return: f64,
    /// `strategy_return - benchmark_return`
    pub excess_return: f64,
}

impl DailyReturn {
    /// Create a row, deriving the excess return.
    pub fn new(date: NaiveDate, strategy_return: f64, benchmark_return: f64) -> Self {
        Self {
            date,
            strategy_return,
            benchmark_return,
            excess_return: strategy_return - benchmark_return,
        }
    }
}

/// Date-ascending, duplicate-free, strictly aligned daily returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    rows: Vec<DailyReturn>,
}

impl ReturnSeries {
    /// Wrap already-aligned rows after checking ordering and finiteness.
    pub fn new(rows: Vec<DailyReturn>) -> RiskstatResult<Self> {
        for pair in rows.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(MetricsError::UnorderedDates {
                    series: "return series",
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }
        if let Some(row) = rows
            .iter()
            .find(|r| !r.strategy_return.is_finite() || !r.benchmark_return.is_finite())
        {
            return Err(MetricsError::InvalidInput(format!(
                "non-finite return on {}",
                row.date
            )));
        }
        Ok(Self { rows })
    }

    /// Inner-join two date-indexed daily return sequences.
    ///
    /// Dates present in only one input are dropped. Fails with
    /// [`MetricsError::Alignment`] when nothing survives the join.
    pub fn from_returns(
        strategy: &[(NaiveDate, f64)],
        benchmark: &[(NaiveDate, f64)],
    ) -> RiskstatResult<Self> {
        check_ascending("strategy", strategy)?;
        check_ascending("benchmark", benchmark)?;

        let mut rows = Vec::with_capacity(strategy.len().min(benchmark.len()));
        let (mut i, mut j) = (0, 0);
        while i < strategy.len() && j < benchmark.len() {
            let (s_date, s_ret) = strategy[i];
            let (b_date, b_ret) = benchmark[j];
            match s_date.cmp(&b_date) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    rows.push(DailyReturn::new(s_date, s_ret, b_ret));
                    i += 1;
                    j += 1;
                }
            }
        }

        if rows.is_empty() {
            return Err(MetricsError::Alignment {
                strategy_days: strategy.len(),
                benchmark_days: benchmark.len(),
            });
        }

        Self::new(rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DailyReturn] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyReturn> {
        self.rows.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn strategy_returns(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.strategy_return).collect()
    }

    pub fn benchmark_returns(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.benchmark_return).collect()
    }

    pub fn excess_returns(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.excess_return).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}

/// Reject a date-indexed sequence whose dates are not strictly ascending.
pub fn check_ascending(series: &'static str, points: &[(NaiveDate, f64)]) -> RiskstatResult<()> {
    for pair in points.windows(2) {
        if pair[1].0 <= pair[0].0 {
            return Err(MetricsError::UnorderedDates {
                series,
                previous: pair[0].0,
                date: pair[1].0,
            });
        }
    }
    Ok(())
}
