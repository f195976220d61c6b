//! Recursive Escher record tree parser.
//!
//! Walks a length-prefixed byte range and builds an owned record tree. The
//! cursor always advances by the *declared* record length, even when the
//! reconstructed record has a different size, so a single bad record cannot
//! desynchronize the rest of the stream.
//!
//! Structural problems that make forward parsing unsafe (a body running past
//! its scope, excessive nesting) abort the call. Everything else is reported
//! as a [`ParseWarning`] and also logged through `tracing`.

use super::record::{AtomDecode, EscherContainerRecord, EscherRecord, HEADER_SIZE, RecordHeader};
use super::types::{EscherRecordType, RecordKind, classify};
use crate::common::error::{Error, Result};
use thiserror::Error as ThisError;

/// Arbitrarily selected upper bound for one record body.
pub const MAX_RECORD_LENGTH: usize = 10_485_760;

/// Default container nesting limit.
pub const MAX_DEPTH: usize = 64;

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_record_length: usize,
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_record_length: MAX_RECORD_LENGTH,
            max_depth: MAX_DEPTH,
        }
    }
}

/// Recoverable anomaly found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ParseWarning {
    /// Declared and reconstructed record sizes differ; the declared one wins
    #[error(
        "Record 0x{record_id:04X} at offset {offset}: length={declared} but reconstructed size is {reconstructed}"
    )]
    SizeMismatch {
        offset: usize,
        record_id: u16,
        declared: usize,
        reconstructed: usize,
    },

    /// Type id not in the registry; body kept as an opaque atom
    #[error("Unknown record type 0x{record_id:04X} at offset {offset} treated as atom")]
    UnknownTypeTreatedAsAtom { offset: usize, record_id: u16 },

    /// Typed atom too short for its fixed layout; body kept opaque
    #[error("Hit short DDF record 0x{record_id:04X} at offset {offset} - {length} body bytes")]
    ShortRecord {
        offset: usize,
        record_id: u16,
        length: usize,
    },
}

/// Parsed top-level records plus the anomalies seen on the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: Vec<EscherRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse `length` bytes of `buffer` starting at `start` into a record list.
pub fn parse(buffer: &[u8], start: usize, length: usize) -> Result<ParsedRecords> {
    EscherParser::new(buffer).parse(start, length)
}

/// Escher record tree parser over a borrowed buffer.
pub struct EscherParser<'data> {
    data: &'data [u8],
    options: ParseOptions,
    warnings: Vec<ParseWarning>,
}

impl<'data> EscherParser<'data> {
    #[inline]
    pub fn new(data: &'data [u8]) -> Self {
        Self::with_options(data, ParseOptions::default())
    }

    pub fn with_options(data: &'data [u8], options: ParseOptions) -> Self {
        Self {
            data,
            options,
            warnings: Vec::new(),
        }
    }

    /// Parse the range `[start, start + length)`.
    pub fn parse(mut self, start: usize, length: usize) -> Result<ParsedRecords> {
        let end = start
            .checked_add(length)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::TruncatedInput {
                offset: start,
                needed: length,
                available: self.data.len().saturating_sub(start),
            })?;
        let records = self.parse_scope(start, end, 0)?;
        Ok(ParsedRecords {
            records,
            warnings: self.warnings,
        })
    }

    fn warn(&mut self, warning: ParseWarning) {
        match warning {
            ParseWarning::UnknownTypeTreatedAsAtom { .. } => tracing::debug!("{warning}"),
            _ => tracing::warn!("{warning}"),
        }
        self.warnings.push(warning);
    }

    /// Parse sibling records in `[pos, end)`.
    ///
    /// Fewer than [`HEADER_SIZE`] trailing bytes end the scope silently.
    fn parse_scope(&mut self, mut pos: usize, end: usize, depth: usize) -> Result<Vec<EscherRecord>> {
        if depth > self.options.max_depth {
            return Err(Error::NestingTooDeep(self.options.max_depth));
        }

        let mut records = Vec::new();
        while end - pos >= HEADER_SIZE {
            let header = RecordHeader::read(self.data, pos)?;
            let body_start = pos + HEADER_SIZE;
            let declared = header.length() as usize;
            let available = end - body_start;
            if declared > available {
                return Err(Error::DeclaredLengthExceedsBuffer {
                    offset: pos,
                    record_id: header.record_id(),
                    declared: header.length(),
                    available,
                });
            }
            if declared > self.options.max_record_length {
                return Err(Error::RecordTooLarge {
                    length: declared,
                    max: self.options.max_record_length,
                });
            }
            let body_end = body_start + declared;

            let record = match classify(header.record_id()) {
                RecordKind::Container => EscherRecord::Container(EscherContainerRecord {
                    options: header.options(),
                    record_id: header.record_id(),
                    children: self.parse_scope(body_start, body_end, depth + 1)?,
                }),
                RecordKind::Atom => self.decode_atom(pos, &header, body_start, body_end),
            };

            let declared_total = declared + HEADER_SIZE;
            let reconstructed = record.record_size();
            if reconstructed != declared_total {
                self.warn(ParseWarning::SizeMismatch {
                    offset: pos,
                    record_id: header.record_id(),
                    declared: declared_total,
                    reconstructed,
                });
            }

            records.push(record);
            pos += declared_total;
        }
        Ok(records)
    }

    fn decode_atom(
        &mut self,
        pos: usize,
        header: &RecordHeader,
        body_start: usize,
        body_end: usize,
    ) -> EscherRecord {
        let record_id = header.record_id();
        if EscherRecordType::from(record_id) == EscherRecordType::Unknown {
            self.warn(ParseWarning::UnknownTypeTreatedAsAtom {
                offset: pos,
                record_id,
            });
        }
        match EscherRecord::decode_atom(header, &self.data[body_start..body_end]) {
            AtomDecode::Typed(record) => record,
            AtomDecode::Short(record) => {
                self.warn(ParseWarning::ShortRecord {
                    offset: pos,
                    record_id,
                    length: body_end - body_start,
                });
                record
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escher::record::{EscherSpRecord, RecordVariant};
    use crate::escher::writer::{ShapeBuilder, ShapeFlags, container, dg, shape_type, spgr};
    use proptest::prelude::*;

    fn sample_tree() -> EscherRecord {
        container(
            EscherRecordType::DgContainer,
            [
                dg(1, 1, 1024),
                container(
                    EscherRecordType::SpgrContainer,
                    [container(
                        EscherRecordType::SpContainer,
                        [
                            spgr(0, 0, 0, 0),
                            ShapeBuilder::new(shape_type::NOT_PRIMITIVE, 1024)
                                .with_flags(ShapeFlags::GROUP | ShapeFlags::PATRIARCH)
                                .build(),
                        ],
                    )],
                ),
            ],
        )
    }

    #[test]
    fn test_roundtrip_tree() {
        let bytes = sample_tree().to_bytes();
        let parsed = parse(&bytes, 0, bytes.len()).unwrap();
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.records, vec![sample_tree()]);

        let mut out = Vec::new();
        for record in &parsed.records {
            record.serialize(&mut out);
        }
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_declared_length_wins_on_mismatch() {
        // Sp atom declaring 9 body bytes: 8 decoded + 1 padding byte
        let mut bytes = vec![0x12, 0x00, 0x0A, 0xF0, 0x09, 0x00, 0x00, 0x00];
        bytes.extend_from_slice(&1024u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.push(0xAA);
        // Followed by a well-formed Sp atom
        let next = ShapeBuilder::new(1, 1025).build().to_bytes();
        bytes.extend_from_slice(&next);

        let parsed = parse(&bytes, 0, bytes.len()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::SizeMismatch {
                offset: 0,
                record_id: 0xF00A,
                declared: 17,
                reconstructed: 16,
            }]
        );
        let EscherRecord::Sp(second) = &parsed.records[1] else {
            panic!("expected Sp");
        };
        assert_eq!(second.shape_id, 1025);
    }

    #[test]
    fn test_body_past_buffer_is_fatal() {
        let bytes = [0x00, 0x00, 0x0B, 0xF1, 0xFF, 0x00, 0x00, 0x00, 1, 2, 3];
        let err = parse(&bytes, 0, bytes.len()).unwrap_err();
        assert!(matches!(
            err,
            Error::DeclaredLengthExceedsBuffer {
                offset: 0,
                declared: 255,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_child_overrunning_parent_is_fatal() {
        // Container of 8 body bytes holding a child that declares 4 more
        let mut bytes = vec![0x0F, 0x00, 0x04, 0xF0, 0x08, 0x00, 0x00, 0x00];
        bytes.extend_from_slice(&[0x00, 0x00, 0x0A, 0xF0, 0x04, 0x00, 0x00, 0x00]);
        bytes.extend_from_slice(&[0; 4]);
        assert!(matches!(
            parse(&bytes, 0, bytes.len()),
            Err(Error::DeclaredLengthExceedsBuffer { offset: 8, .. })
        ));
    }

    #[test]
    fn test_range_outside_buffer() {
        let bytes = [0u8; 4];
        assert!(matches!(parse(&bytes, 2, 8), Err(Error::TruncatedInput { .. })));
    }

    #[test]
    fn test_trailing_padding_ignored() {
        let mut bytes = ShapeBuilder::new(1, 1024).build().to_bytes();
        bytes.extend_from_slice(&[0; 7]);
        let parsed = parse(&bytes, 0, bytes.len()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_unknown_and_short_records() {
        let mut bytes = vec![0x00, 0x00, 0x77, 0xF0, 0x02, 0x00, 0x00, 0x00, 0xAB, 0xCD];
        bytes.extend_from_slice(&[0x02, 0x00, 0x0A, 0xF0, 0x02, 0x00, 0x00, 0x00, 0x01, 0x02]);
        let parsed = parse(&bytes, 0, bytes.len()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(matches!(
            parsed.warnings[0],
            ParseWarning::UnknownTypeTreatedAsAtom {
                offset: 0,
                record_id: 0xF077
            }
        ));
        assert!(matches!(
            parsed.warnings[1],
            ParseWarning::ShortRecord {
                offset: 10,
                record_id: 0xF00A,
                length: 2
            }
        ));
        assert!(EscherSpRecord::from_record(&parsed.records[1]).is_none());
        // Opaque atoms still round-trip
        let mut out = Vec::new();
        for record in &parsed.records {
            record.serialize(&mut out);
        }
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_nesting_limit() {
        let mut record = container(EscherRecordType::SpContainer, []);
        for _ in 0..4 {
            record = container(EscherRecordType::SpgrContainer, [record]);
        }
        let bytes = record.to_bytes();
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::default()
        };
        let result = EscherParser::with_options(&bytes, options).parse(0, bytes.len());
        assert!(matches!(result, Err(Error::NestingTooDeep(2))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Opaque atoms of any size and padding never desynchronize the cursor.
        #[test]
        fn prop_cursor_follows_declared_length(
            bodies in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 1..8),
            padding in 0usize..8,
        ) {
            let mut bytes = Vec::new();
            for body in &bodies {
                bytes.extend_from_slice(&[0x00, 0x00, 0x1E, 0xF1]);
                bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
                bytes.extend_from_slice(body);
            }
            let content_len = bytes.len();
            bytes.extend(std::iter::repeat_n(0u8, padding));

            let parsed = parse(&bytes, 0, bytes.len()).unwrap();
            prop_assert_eq!(parsed.records.len(), bodies.len());
            let mut out = Vec::new();
            for record in &parsed.records {
                record.serialize(&mut out);
            }
            prop_assert_eq!(&out[..], &bytes[..content_len]);
        }
    }
}
