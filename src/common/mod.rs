//! Common types and utilities shared across the drawing and geometry layers.

pub mod binary;
pub mod error;

pub use error::{Error, Result};
