//! Shared overhead pool allocation.

pub mod service;

#[cfg(test)]
mod props;

pub use service::OverheadService;
