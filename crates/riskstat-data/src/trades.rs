//! CSV trade blotter source.

use csv::ReaderBuilder;
use riskstat_core::{DataError, Side, TradeRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::csv_source::parse_date;

/// Trade CSV record format.
#[derive(Debug, Deserialize)]
struct TradeCsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Side", alias = "direction", alias = "Direction")]
    side: String,
    #[serde(alias = "Quantity", alias = "qty", alias = "Qty")]
    quantity: String,
    #[serde(alias = "Price")]
    price: String,
    #[serde(alias = "Commission", alias = "fee", alias = "fees", default)]
    commission: Option<String>,
}

fn parse_side(s: &str) -> Result<Side, DataError> {
    match s.trim().to_lowercase().as_str() {
        "buy" | "b" | "long" => Ok(Side::Buy),
        "sell" | "s" | "short" => Ok(Side::Sell),
        other => Err(DataError::ParseError(format!("Unknown side: {}", other))),
    }
}

fn parse_decimal(field: &str, s: &str, row: usize) -> Result<Decimal, DataError> {
    Decimal::from_str(s.trim()).map_err(|e| {
        DataError::ParseError(format!("row {}: invalid {} '{}': {}", row, field, s, e))
    })
}

/// Load a trade blotter from a CSV file.
pub fn load_trades(path: impl AsRef<Path>) -> Result<Vec<TradeRecord>, DataError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::NotFound(path.display().to_string()));
    }

    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let trades = read_trades(reader)?;
    debug!(path = %path.display(), trades = trades.len(), "Loaded trades");
    Ok(trades)
}

/// Read trade records from any CSV reader, stably sorted by date.
///
/// Quantities are taken as absolute values; direction comes from the side
/// column.
pub fn read_trades<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<TradeRecord>, DataError> {
    let mut trades = Vec::new();

    for (i, result) in reader.deserialize().enumerate() {
        let row = i + 1;
        let record: TradeCsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        let commission = match record.commission.as_deref() {
            Some(s) if !s.trim().is_empty() => parse_decimal("commission", s, row)?,
            _ => Decimal::ZERO,
        };

        trades.push(
            TradeRecord::new(
                parse_date(&record.date)?,
                parse_side(&record.side)?,
                parse_decimal("quantity", &record.quantity, row)?.abs(),
                parse_decimal("price", &record.price, row)?,
            )
            .with_commission(commission),
        );
    }

    trades.sort_by_key(|t| t.date);
    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn test_read_trades() {
        let data = "date,side,quantity,price,commission\n\
                    2024-01-03,Sell,2,105.5,1.2\n\
                    2024-01-02,buy,2,100,\n";
        let trades = read_trades(reader(data)).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(trades[0].side, Side::Buy);
        assert_eq!(trades[0].commission, Decimal::ZERO);
        assert_eq!(trades[1].price, dec!(105.5));
        assert_eq!(trades[1].commission, dec!(1.2));
    }

    #[test]
    fn test_commission_column_is_optional() {
        let data = "Date,Side,Qty,Price\n2024-01-02,long,-3,10\n";
        let trades = read_trades(reader(data)).unwrap();
        assert_eq!(trades[0].quantity, dec!(3));
        assert_eq!(trades[0].signed_quantity(), dec!(3));
    }

    #[test]
    fn test_unknown_side_is_rejected() {
        let data = "date,side,quantity,price\n2024-01-02,hold,1,10\n";
        assert!(matches!(
            read_trades(reader(data)),
            Err(DataError::ParseError(_))
        ));
    }
}
