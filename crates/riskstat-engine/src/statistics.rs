//! Trade statistics.

use chrono::NaiveDate;
use riskstat_core::{ClosedTrade, OpenTrade, PositionState, TradeRecord, Transition};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Closed trades recovered from an ordered fill sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeStatistics {
    /// Completed round trips in closing order
    pub closed_trades: Vec<ClosedTrade>,
    /// Position still open after the last fill
    pub open_trade: Option<OpenTrade>,
    /// Number of trades with positive net P&L
    pub winning_trades: usize,
    /// Number of trades with negative net P&L
    pub losing_trades: usize,
    /// Sum of winning trade P&L
    pub gross_profit: Decimal,
    /// Sum of losing trade P&L, as a positive amount
    pub gross_loss: Decimal,
}

impl TradeStatistics {
    /// Run the position reducer over `trades` and tally the closed trades.
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let mut stats = Self::default();
        let mut state = PositionState::Flat;

        for trade in trades {
            let (next, transition) = state.apply(trade);
            if let Some(closed) = transition.closed_trade() {
                stats.record(closed.clone());
            }
            state = next;
        }

        stats.open_trade = state.open_trade().cloned();
        debug!(
            fills = trades.len(),
            closed = stats.closed_trades.len(),
            open = stats.open_trade.is_some(),
            "Paired fills into trades"
        );
        stats
    }

    fn record(&mut self, trade: ClosedTrade) {
        if trade.is_win() {
            self.winning_trades += 1;
            self.gross_profit += trade.pnl;
        } else if trade.is_loss() {
            self.losing_trades += 1;
            self.gross_loss += trade.pnl.abs();
        }
        self.closed_trades.push(trade);
    }

    /// Number of closed trades.
    pub fn total_trades(&self) -> usize {
        self.closed_trades.len()
    }

    /// Closed trades that neither won nor lost.
    pub fn breakeven_trades(&self) -> usize {
        self.total_trades() - self.winning_trades - self.losing_trades
    }

    /// Share of closed trades with positive P&L; `None` with no closed trades.
    pub fn win_rate(&self) -> Option<f64> {
        if self.closed_trades.is_empty() {
            return None;
        }
        Some(self.winning_trades as f64 / self.total_trades() as f64)
    }

    /// Mean winning P&L over the absolute mean losing P&L.
    ///
    /// `None` unless there is at least one winner and one loser.
    pub fn profit_loss_ratio(&self) -> Option<f64> {
        if self.winning_trades == 0 || self.losing_trades == 0 {
            return None;
        }
        let avg_win = self.gross_profit / Decimal::from(self.winning_trades);
        let avg_loss = self.gross_loss / Decimal::from(self.losing_trades);
        (avg_win / avg_loss).to_f64()
    }
}

/// Share of days with a positive strategy return; `None` for no days.
pub fn daily_win_rate(returns: &[f64]) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let winning_days = returns.iter().filter(|&&r| r > 0.0).count();
    Some(winning_days as f64 / returns.len() as f64)
}

/// Realized P&L of every fill, net of its commission, summed per fill date.
pub fn realized_pnl_by_date(trades: &[TradeRecord]) -> Vec<(NaiveDate, Decimal)> {
    let mut booked: Vec<(NaiveDate, Decimal)> = Vec::new();
    let mut state = PositionState::Flat;

    for trade in trades {
        let before = state
            .open_trade()
            .map(|t| t.realized_pnl)
            .unwrap_or(Decimal::ZERO);
        let (next, transition) = state.apply(trade);
        let after = match &transition {
            Transition::Closed(closed) | Transition::Reversed(closed) => closed.gross_pnl,
            Transition::Reduced => next
                .open_trade()
                .map(|t| t.realized_pnl)
                .unwrap_or(Decimal::ZERO),
            _ => before,
        };
        let pnl = after - before - trade.commission;
        state = next;

        match booked.last_mut() {
            Some((date, total)) if *date == trade.date => *total += pnl,
            _ => booked.push((trade.date, pnl)),
        }
    }

    booked
}

/// Equity implied by realized P&L.
///
/// With an empty `calendar` the curve has one point per fill date, preceded by
/// `initial_capital` on the day before the first fill so that the first fill
/// date has a defined return. Otherwise the curve has one point per calendar
/// date, holding `initial_capital` plus everything realized on or before it;
/// days without fills become zero-return days.
pub fn realized_equity_curve(
    trades: &[TradeRecord],
    initial_capital: Decimal,
    calendar: &[NaiveDate],
) -> Vec<(NaiveDate, f64)> {
    let booked = realized_pnl_by_date(trades);
    let as_f64 = |value: Decimal| value.to_f64().unwrap_or(0.0);
    let mut equity = initial_capital;

    if calendar.is_empty() {
        let mut curve = Vec::with_capacity(booked.len() + 1);
        if let Some(anchor) = booked.first().and_then(|(date, _)| date.pred_opt()) {
            curve.push((anchor, as_f64(initial_capital)));
        }
        for (date, pnl) in booked {
            equity += pnl;
            curve.push((date, as_f64(equity)));
        }
        return curve;
    }

    let mut pending = booked.into_iter().peekable();
    let curve = calendar
        .iter()
        .map(|&date| {
            while let Some((_, pnl)) = pending.next_if(|(booked_date, _)| *booked_date <= date) {
                equity += pnl;
            }
            (date, as_f64(equity))
        })
        .collect();

    let dropped: Vec<(NaiveDate, Decimal)> = pending.collect();
    if let (Some((first, _)), Some(last_date)) = (dropped.first(), calendar.last()) {
        let pnl: Decimal = dropped.iter().map(|(_, pnl)| *pnl).sum();
        warn!(
            %first,
            %last_date,
            fill_dates = dropped.len(),
            %pnl,
            "Ignoring realized P&L booked after the last calendar date"
        );
    }

    curve
}
