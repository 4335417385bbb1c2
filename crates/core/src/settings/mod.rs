//! Company-wide configuration values and defaults.

pub mod types;

pub use types::{CompanySettings, SettingsError};
