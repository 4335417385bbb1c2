//! Department annual metrics.

pub mod error;
pub mod service;
pub mod types;

pub use error::MetricsError;
pub use service::MetricsService;
pub use types::{AnnualMetrics, AnnualMetricsInput};
