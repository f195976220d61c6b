//! Escher (Office Drawing, DDF) record layer.
//!
//! Escher is the drawing layer format shared by the binary Office
//! applications. Records form a tree: containers hold children, atoms hold
//! fixed or opaque payloads.
//!
//! # Architecture
//!
//! - Owned record tree with typed variants for the atoms the drawing layer edits
//! - Declared-length driven parsing that tolerates size anomalies
//! - Pre-order traversal with generic typed search
//! - Builders for authoring new drawings

pub mod types;
pub mod record;
pub mod parser;
pub mod container;
pub mod properties;
pub mod writer;

pub use types::{EscherRecordType, RecordKind, classify};
pub use record::{
    EscherAtomRecord, EscherClientDataRecord, EscherContainerRecord, EscherDgRecord,
    EscherOptRecord, EscherRecord, EscherSpRecord, EscherSpgrRecord, EscherTextboxRecord,
    HEADER_SIZE, RecordHeader, RecordVariant,
};
pub use parser::{EscherParser, ParseOptions, ParseWarning, ParsedRecords, parse};
pub use container::{Found, RecordPath, Walk, find_all, find_first};
pub use properties::{EscherProperties, EscherProperty};
pub use writer::{PropertyBuilder, ShapeBuilder, ShapeFlags};
