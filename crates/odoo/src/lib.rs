//! Odoo ERP integration for Pulso.
//!
//! This crate owns everything that talks to Odoo:
//! - `xmlrpc` - a minimal XML-RPC value codec (requests and responses)
//! - `client` - the HTTP client for the `common` and `object` endpoints
//! - `types` - strict internal types normalized from Odoo's duck-typed
//!   responses; the ambiguity never leaks past this crate
//! - `crypto` - symmetric encryption for credentials at rest

pub mod client;
pub mod crypto;
pub mod error;
pub mod types;
pub mod xmlrpc;

pub use client::{AuthContext, OdooClient};
pub use crypto::CredentialCipher;
pub use error::OdooError;
pub use types::{BillingType, HoursGroup, OdooDepartment};
pub use xmlrpc::Value;
