//! Month periods and activity windows.

pub mod period;

#[cfg(test)]
mod period_props;

pub use period::{Period, PeriodError, active_in_period};
