//! Unified error types for the crate.

pub mod types;

pub use types::{Error, Result};
