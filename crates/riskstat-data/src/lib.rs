//! Data loaders for strategy, benchmark and trade files.

mod csv_source;
mod trades;

pub use csv_source::{parse_date, read_series, CsvSeriesSource};
pub use trades::{load_trades, read_trades};

use chrono::NaiveDate;
use riskstat_core::DataError;
use std::path::Path;

/// Load a date/value series from a CSV file.
pub fn load_series(path: impl AsRef<Path>) -> Result<Vec<(NaiveDate, f64)>, DataError> {
    CsvSeriesSource::new(path)?.load()
}
