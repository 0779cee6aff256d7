//! Trade event types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +1 for buys, -1 for sells.
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => Decimal::NEGATIVE_ONE,
        }
    }
}

/// A single executed trade event.
///
/// Records are expected in date order; several records on the same date are
/// applied in the order given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Execution date
    pub date: NaiveDate,
    /// Direction of the fill
    pub side: Side,
    /// Filled quantity (always non-negative; direction comes from `side`)
    pub quantity: Decimal,
    /// Fill price
    pub price: Decimal,
    /// Fees charged on this fill
    #[serde(default)]
    pub commission: Decimal,
}

impl TradeRecord {
    /// Create a new trade record without commission.
    pub fn new(date: NaiveDate, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            date,
            side,
            quantity,
            price,
            commission: Decimal::ZERO,
        }
    }

    /// Builder-style commission setter.
    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission = commission;
        self
    }

    /// Quantity signed by direction (positive buys, negative sells).
    pub fn signed_quantity(&self) -> Decimal {
        self.side.sign() * self.quantity.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_quantity() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let buy = TradeRecord::new(date, Side::Buy, dec!(3), dec!(100));
        let sell = TradeRecord::new(date, Side::Sell, dec!(3), dec!(100));

        assert_eq!(buy.signed_quantity(), dec!(3));
        assert_eq!(sell.signed_quantity(), dec!(-3));
    }

    #[test]
    fn test_commission_defaults_to_zero_when_absent() {
        let json = r#"{"date":"2024-03-01","side":"sell","quantity":"2","price":"10.5"}"#;
        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(trade.side, Side::Sell);
        assert_eq!(trade.commission, Decimal::ZERO);
    }
}
