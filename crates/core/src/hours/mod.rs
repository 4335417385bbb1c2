//! Capacity and utilization calculations.

pub mod service;

pub use service::HoursService;
