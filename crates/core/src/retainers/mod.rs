//! Retainer pricing and catalog margins.

pub mod service;
pub mod types;

pub use service::RetainerService;
pub use types::{CatalogMargins, RetainerPricing};
