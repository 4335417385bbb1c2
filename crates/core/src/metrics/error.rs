//! Annual metrics error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors in the annual metrics calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// Target margin at or above the supported ceiling.
    ///
    /// Minimum revenue divides by `1 - target_margin`; margins at or above
    /// the ceiling are rejected instead of letting the denominator collapse.
    #[error("Target margin {margin} exceeds the supported ceiling {ceiling}")]
    MarginTooHigh {
        /// Configured target margin.
        margin: Decimal,
        /// Maximum accepted margin (exclusive).
        ceiling: Decimal,
    },
}
