//! Department helpers.

pub mod code;

pub use code::generate_code;
