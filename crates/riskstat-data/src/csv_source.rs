//! CSV value/price series source.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use riskstat_core::DataError;
use tracing::{debug, warn};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(
        alias = "Close",
        alias = "close",
        alias = "Adj Close",
        alias = "Value",
        alias = "equity",
        alias = "Equity",
        alias = "nav",
        alias = "NAV"
    )]
    value: f64,
}

/// Date-indexed value series stored as CSV (benchmark closes or strategy
/// equity).
pub struct CsvSeriesSource {
    path: PathBuf,
}

impl CsvSeriesSource {
    /// Create a new CSV series source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load the whole series, date-ascending with one point per date.
    pub fn load(&self) -> Result<Vec<(NaiveDate, f64)>, DataError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let name = self.path.display().to_string();
        let series = read_series(reader, &name)?;
        debug!(path = %name, points = series.len(), "Loaded series");
        Ok(series)
    }
}

/// Read a date/value CSV from any reader.
///
/// Rows are sorted by date; when a date repeats, the last row wins.
pub fn read_series<R: Read>(
    mut reader: csv::Reader<R>,
    name: &str,
) -> Result<Vec<(NaiveDate, f64)>, DataError> {
    let mut points = Vec::new();

    for (row, result) in reader.deserialize().enumerate() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let date = parse_date(&record.date)?;
        if !record.value.is_finite() {
            return Err(DataError::ParseError(format!(
                "{}: non-finite value on row {}",
                name,
                row + 1
            )));
        }
        points.push((date, record.value));
    }

    if points.is_empty() {
        return Err(DataError::Empty(name.to_string()));
    }

    // Stable sort keeps file order within a date, so the last row wins below.
    points.sort_by_key(|(date, _)| *date);

    let mut deduped: Vec<(NaiveDate, f64)> = Vec::with_capacity(points.len());
    for (date, value) in points {
        match deduped.last_mut() {
            Some(last) if last.0 == date => {
                warn!(series = name, %date, "Duplicate date, keeping last row");
                last.1 = value;
            }
            _ => deduped.push((date, value)),
        }
    }

    Ok(deduped)
}

/// Parse the date formats commonly found in exported price files.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_str = date_str.trim();

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), expected);
        assert!(parse_date("15th of January").is_err());
    }

    #[test]
    fn test_read_series_sorts_and_dedupes() {
        let data = "Date,Open,Close\n2024-01-03,1,102.0\n2024-01-02,1,101.0\n2024-01-03,1,103.5\n";
        let series = read_series(reader(data), "test").unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0], (NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 101.0));
        assert_eq!(series[1], (NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 103.5));
    }

    #[test]
    fn test_equity_column_alias() {
        let data = "date,equity\n2024-01-02,1000000\n2024-01-03,1001500\n";
        let series = read_series(reader(data), "test").unwrap();
        assert_eq!(series[1].1, 1_001_500.0);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let data = "date,close\n";
        assert!(matches!(
            read_series(reader(data), "test"),
            Err(DataError::Empty(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvSeriesSource::new("/nonexistent/bench.csv"),
            Err(DataError::NotFound(_))
        ));
    }
}
