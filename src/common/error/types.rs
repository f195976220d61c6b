//! Unified error type for drawing records and shape geometry.
//!
//! Only conditions that make further work unsafe are errors. Recoverable
//! record anomalies are reported as [`crate::escher::ParseWarning`] values.
use thiserror::Error;

use super::super::binary::BinaryError;

/// Main error type for OfficeArt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while writing records out
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Not enough bytes for a record header or the requested range
    #[error("Truncated input at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A record body would run past the end of its enclosing scope
    #[error(
        "Record 0x{record_id:04X} at offset {offset} declares {declared} body bytes, only {available} available"
    )]
    DeclaredLengthExceedsBuffer {
        offset: usize,
        record_id: u16,
        declared: u32,
        available: usize,
    },

    /// A record exceeds the configured allocation limit
    #[error("Record of {length} bytes exceeds the maximum of {max} bytes")]
    RecordTooLarge { length: usize, max: usize },

    /// Containers nested deeper than the configured limit
    #[error("Record nesting exceeds depth {0}")]
    NestingTooDeep(usize),

    /// Guide formula operator is not part of the guide language
    #[error("Unknown operator '{op}' in guide '{guide}'")]
    UnknownGuideOperator { guide: String, op: String },

    /// Guide formulas reference each other in a cycle
    #[error("Cyclic reference while evaluating guide '{0}'")]
    CyclicGuideReference(String),

    /// Operand is not a number, guide, adjust value or built-in
    #[error("Unknown guide reference '{0}'")]
    UnknownGuideReference(String),

    /// Path segment issued before any move-to
    #[error("Path command {0} has no current point")]
    MissingCurrentPoint(&'static str),

    /// Preset geometry resource could not be read
    #[error("Preset geometry error: {0}")]
    Preset(String),

    /// Short read inside a fixed-layout record
    #[error("Binary error: {0}")]
    Binary(#[from] BinaryError),
}

/// Result type for OfficeArt operations.
pub type Result<T> = std::result::Result<T, Error>;
