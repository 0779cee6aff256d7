//! Core types for the risk metrics system.
//!
//! This crate provides the foundational building blocks including:
//! - Trade records and the FLAT/LONG/SHORT position reducer
//! - Aligned daily return series
//! - Computation configuration and diagnostics

pub mod types;
pub mod error;

pub use error::{DataError, MetricsError, RiskstatResult};
pub use types::*;
