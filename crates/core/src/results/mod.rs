//! Monthly financial result computation.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ResultService;
pub use types::{MonthlyResult, PlanSnapshot, ResultInput};
