//! Position state machine used to pair fills into closed trades.

use chrono::NaiveDate;
use num_traits::Signed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Side, TradeRecord};

/// A trade that has been opened and not yet brought back to flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTrade {
    /// Date of the opening fill
    pub opened: NaiveDate,
    /// Current signed quantity (positive for long, negative for short)
    pub quantity: Decimal,
    /// Quantity-weighted average entry price
    pub entry_price: Decimal,
    /// Largest absolute size held during the trade
    pub max_quantity: Decimal,
    /// Gross P&L realized by partial exits so far
    pub realized_pnl: Decimal,
    /// Fees charged to this trade so far
    pub commission: Decimal,
    exit_quantity: Decimal,
    exit_value: Decimal,
}

impl OpenTrade {
    fn open(trade: &TradeRecord, quantity: Decimal, commission: Decimal) -> Self {
        Self {
            opened: trade.date,
            quantity,
            entry_price: trade.price,
            max_quantity: quantity.abs(),
            realized_pnl: Decimal::ZERO,
            commission,
            exit_quantity: Decimal::ZERO,
            exit_value: Decimal::ZERO,
        }
    }

    /// Direction of the trade.
    pub fn side(&self) -> Side {
        if self.quantity > Decimal::ZERO {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    fn close(self, date: NaiveDate) -> ClosedTrade {
        let exit_price = if self.exit_quantity.is_zero() {
            self.entry_price
        } else {
            self.exit_value / self.exit_quantity
        };
        ClosedTrade {
            opened: self.opened,
            closed: date,
            side: self.side(),
            quantity: self.max_quantity,
            entry_price: self.entry_price,
            exit_price,
            gross_pnl: self.realized_pnl,
            commission: self.commission,
            pnl: self.realized_pnl - self.commission,
        }
    }

    fn apply_fill(mut self, trade: &TradeRecord, fill: Decimal) -> (PositionState, Transition) {
        // Adding to the position: re-average the entry price.
        if fill.signum() == self.quantity.signum() {
            let total_cost = self.quantity * self.entry_price + fill * trade.price;
            self.quantity += fill;
            self.entry_price = total_cost / self.quantity;
            self.max_quantity = self.max_quantity.max(self.quantity.abs());
            self.commission += trade.commission;
            return (PositionState::holding(self), Transition::Increased);
        }

        let held = self.quantity.abs();
        let close_qty = fill.abs().min(held);
        self.realized_pnl += (trade.price - self.entry_price) * close_qty * self.quantity.signum();
        self.exit_quantity += close_qty;
        self.exit_value += close_qty * trade.price;
        self.commission += trade.commission;

        if close_qty < held {
            self.quantity += fill;
            return (PositionState::holding(self), Transition::Reduced);
        }

        let remaining = fill.abs() - close_qty;
        let closed = self.close(trade.date);
        if remaining.is_zero() {
            (PositionState::Flat, Transition::Closed(closed))
        } else {
            // The reversing fill's commission stays with the trade it closed.
            let reopened = OpenTrade::open(trade, fill.signum() * remaining, Decimal::ZERO);
            (PositionState::holding(reopened), Transition::Reversed(closed))
        }
    }
}

/// A round trip from flat (or a reversal) back to flat (or the next reversal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub opened: NaiveDate,
    pub closed: NaiveDate,
    /// `Buy` for a long trade, `Sell` for a short trade
    pub side: Side,
    /// Largest absolute size held
    pub quantity: Decimal,
    /// Average entry price
    pub entry_price: Decimal,
    /// Quantity-weighted average exit price
    pub exit_price: Decimal,
    /// Sum of (exit - entry) * signed closed quantity
    pub gross_pnl: Decimal,
    pub commission: Decimal,
    /// Gross P&L net of commission
    pub pnl: Decimal,
}

impl ClosedTrade {
    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < Decimal::ZERO
    }
}

/// What a single fill did to the position.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Zero-quantity fill
    Unchanged,
    /// Flat to long or short
    Opened,
    /// Same-direction fill
    Increased,
    /// Partial exit; the trade stays open
    Reduced,
    /// Back to flat
    Closed(ClosedTrade),
    /// Through flat to the opposite side in one fill
    Reversed(ClosedTrade),
}

impl Transition {
    /// The trade closed by this transition, if any.
    pub fn closed_trade(&self) -> Option<&ClosedTrade> {
        match self {
            Transition::Closed(trade) | Transition::Reversed(trade) => Some(trade),
            _ => None,
        }
    }
}

/// FLAT / LONG / SHORT position reducer.
///
/// Fold an ordered sequence of [`TradeRecord`]s through [`PositionState::apply`]
/// to recover trade boundaries. A fill that crosses zero closes the current
/// trade and opens the opposite one within the same event.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(OpenTrade),
    Short(OpenTrade),
}

impl PositionState {
    fn holding(trade: OpenTrade) -> Self {
        if trade.quantity > Decimal::ZERO {
            PositionState::Long(trade)
        } else {
            PositionState::Short(trade)
        }
    }

    /// Apply one fill, returning the next state and what happened.
    pub fn apply(self, trade: &TradeRecord) -> (Self, Transition) {
        let fill = trade.signed_quantity();
        if fill.is_zero() {
            return (self, Transition::Unchanged);
        }

        match self {
            PositionState::Flat => {
                let open = OpenTrade::open(trade, fill, trade.commission);
                (PositionState::holding(open), Transition::Opened)
            }
            PositionState::Long(open) | PositionState::Short(open) => open.apply_fill(trade, fill),
        }
    }

    /// Check if the position is flat.
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    /// Current signed quantity.
    pub fn quantity(&self) -> Decimal {
        self.open_trade()
            .map(|t| t.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// The trade currently open, if any.
    pub fn open_trade(&self) -> Option<&OpenTrade> {
        match self {
            PositionState::Flat => None,
            PositionState::Long(open) | PositionState::Short(open) => Some(open),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn fill(d: u32, side: Side, qty: Decimal, price: Decimal) -> TradeRecord {
        TradeRecord::new(day(d), side, qty, price)
    }

    #[test]
    fn test_long_round_trip() {
        let (state, t) = PositionState::Flat.apply(&fill(1, Side::Buy, dec!(10), dec!(100)));
        assert_eq!(t, Transition::Opened);
        assert!(matches!(state, PositionState::Long(_)));

        let (state, t) = state.apply(&fill(3, Side::Sell, dec!(10), dec!(105)));
        assert!(state.is_flat());
        let closed = t.closed_trade().unwrap();
        assert_eq!(closed.pnl, dec!(50));
        assert_eq!(closed.side, Side::Buy);
        assert_eq!(closed.opened, day(1));
        assert_eq!(closed.closed, day(3));
    }

    #[test]
    fn test_short_round_trip() {
        let (state, _) = PositionState::Flat.apply(&fill(1, Side::Sell, dec!(5), dec!(20)));
        assert!(matches!(state, PositionState::Short(_)));
        assert_eq!(state.quantity(), dec!(-5));

        let (state, t) = state.apply(&fill(2, Side::Buy, dec!(5), dec!(22)));
        assert!(state.is_flat());
        // (22 - 20) * -5
        assert_eq!(t.closed_trade().unwrap().pnl, dec!(-10));
    }

    #[test]
    fn test_reversal_closes_and_opens_in_one_event() {
        let (state, _) = PositionState::Flat.apply(&fill(1, Side::Buy, dec!(10), dec!(100)));
        let (state, t) = state.apply(&fill(2, Side::Sell, dec!(15), dec!(110)));

        match t {
            Transition::Reversed(closed) => assert_eq!(closed.pnl, dec!(100)),
            other => panic!("expected reversal, got {:?}", other),
        }
        match &state {
            PositionState::Short(open) => {
                assert_eq!(open.quantity, dec!(-5));
                assert_eq!(open.entry_price, dec!(110));
                assert_eq!(open.opened, day(2));
            }
            other => panic!("expected short, got {:?}", other),
        }
    }

    #[test]
    fn test_scale_in_averages_entry() {
        let (state, _) = PositionState::Flat.apply(&fill(1, Side::Buy, dec!(100), dec!(150)));
        let (state, t) = state.apply(&fill(2, Side::Buy, dec!(100), dec!(160)));
        assert_eq!(t, Transition::Increased);
        assert_eq!(state.open_trade().unwrap().entry_price, dec!(155));
        assert_eq!(state.quantity(), dec!(200));
    }

    #[test]
    fn test_partial_exit_keeps_trade_open() {
        let (state, _) = PositionState::Flat.apply(&fill(1, Side::Buy, dec!(10), dec!(100)));
        let (state, t) = state.apply(&fill(2, Side::Sell, dec!(4), dec!(110)));
        assert_eq!(t, Transition::Reduced);
        assert_eq!(state.quantity(), dec!(6));

        let (state, t) = state.apply(&fill(3, Side::Sell, dec!(6), dec!(90)));
        assert!(state.is_flat());
        let closed = t.closed_trade().unwrap();
        // 4 * 10 + 6 * -10
        assert_eq!(closed.pnl, dec!(-20));
        assert_eq!(closed.quantity, dec!(10));
        assert_eq!(closed.exit_price, dec!(98));
    }

    #[test]
    fn test_short_cover_in_steps() {
        let (state, _) = PositionState::Flat.apply(&fill(1, Side::Sell, dec!(10), dec!(50)));
        let (state, t) = state.apply(&fill(2, Side::Buy, dec!(4), dec!(45)));
        assert_eq!(t, Transition::Reduced);
        assert_eq!(state.quantity(), dec!(-6));
        // (45 - 50) * 4 * -1
        assert_eq!(state.open_trade().unwrap().realized_pnl, dec!(20));

        let (state, t) = state.apply(&fill(3, Side::Buy, dec!(8), dec!(55)));
        let closed = t.closed_trade().unwrap();
        // 20 + (55 - 50) * 6 * -1
        assert_eq!(closed.pnl, dec!(-10));
        assert_eq!(closed.side, Side::Sell);
        assert_eq!(state.quantity(), dec!(2));
        assert!(matches!(state, PositionState::Long(_)));
    }

    #[test]
    fn test_commission_is_netted() {
        let open = fill(1, Side::Buy, dec!(1), dec!(100)).with_commission(dec!(1.5));
        let exit = fill(2, Side::Sell, dec!(1), dec!(103)).with_commission(dec!(1.5));

        let (state, _) = PositionState::Flat.apply(&open);
        let (_, t) = state.apply(&exit);
        let closed = t.closed_trade().unwrap();
        assert_eq!(closed.gross_pnl, dec!(3));
        assert_eq!(closed.pnl, dec!(0));
        assert!(!closed.is_win());
        assert!(!closed.is_loss());
    }

    #[test]
    fn test_zero_quantity_is_ignored() {
        let (state, t) = PositionState::Flat.apply(&fill(1, Side::Buy, dec!(0), dec!(100)));
        assert!(state.is_flat());
        assert_eq!(t, Transition::Unchanged);
    }
}
