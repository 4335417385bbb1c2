//! Core business logic for Pulso.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain calculations live here; persistence and RPC are layered on top.
//!
//! # Modules
//!
//! - `fiscal` - Month periods and activity windows
//! - `settings` - Company-wide configuration values and defaults
//! - `hours` - Capacity and utilization calculations
//! - `retainers` - Retainer pricing and catalog margins
//! - `overhead` - Shared overhead pool allocation
//! - `metrics` - Department annual metrics
//! - `results` - Monthly financial result computation
//! - `department` - Department code generation

pub mod department;
pub mod fiscal;
pub mod hours;
pub mod metrics;
pub mod overhead;
pub mod results;
pub mod retainers;
pub mod settings;
