//! Core data types for the risk metrics system.

mod config;
mod diagnostic;
mod position;
mod returns;
mod trade;

pub use config::MetricsConfig;
pub use diagnostic::Diagnostic;
pub use position::{ClosedTrade, OpenTrade, PositionState, Transition};
pub use returns::{check_ascending, DailyReturn, ReturnSeries};
pub use trade::{Side, TradeRecord};
