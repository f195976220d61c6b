//! PowerPoint records embedded in Escher client atoms.
//!
//! `ClientTextbox` and `ClientData` atoms carry ordinary PPT records (text,
//! style runs, programmable tags). They share the Escher header layout but use
//! their own type ids and container set. Parsing is lenient: a record that
//! claims more bytes than remain is clamped to what is present, and a
//! container nested deeper than [`MAX_DEPTH`] keeps its body as raw bytes.

use super::consts::PptRecordType;
use crate::common::binary::{
    decode_latin1, decode_utf16le, encode_latin1, encode_utf16le, read_u16_le, read_u32_le,
};
use crate::escher::parser::MAX_DEPTH;
use crate::escher::record::{HEADER_SIZE, RecordHeader};
use zerocopy::IntoBytes;

/// A PPT record with its body or child records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PptRecord {
    /// Record type
    pub record_type: PptRecordType,
    /// Original record type value (for unknown types)
    pub record_type_raw: u16,
    /// Record version
    pub version: u16,
    /// Record instance (sub-type)
    pub instance: u16,
    /// Record body (atoms, and containers kept opaque)
    pub data: Vec<u8>,
    /// Child records (containers only)
    pub children: Vec<PptRecord>,
}

impl PptRecord {
    /// Create an atom record.
    pub fn atom(record_type: PptRecordType, data: Vec<u8>) -> Self {
        Self {
            record_type,
            record_type_raw: record_type.as_u16(),
            version: 0,
            instance: 0,
            data,
            children: Vec::new(),
        }
    }

    /// Create a container record (version 0xF).
    pub fn container(record_type: PptRecordType, children: Vec<PptRecord>) -> Self {
        Self {
            record_type,
            record_type_raw: record_type.as_u16(),
            version: 0x0F,
            instance: 0,
            data: Vec::new(),
            children,
        }
    }

    /// Create a `TextCharsAtom` holding `text` as UTF-16LE.
    pub fn text_chars(text: &str) -> Self {
        Self::atom(PptRecordType::TextCharsAtom, encode_utf16le(text))
    }

    /// Create a `CString` atom.
    pub fn cstring(text: &str) -> Self {
        Self::atom(PptRecordType::CString, encode_utf16le(text))
    }

    /// Parse one record at `offset`.
    ///
    /// Returns the record and the number of bytes consumed, or `None` when no
    /// full header is present.
    pub fn parse(data: &[u8], offset: usize) -> Option<(Self, usize)> {
        Self::parse_at(data, offset, 0)
    }

    fn parse_at(data: &[u8], offset: usize, depth: usize) -> Option<(Self, usize)> {
        let options = read_u16_le(data, offset).ok()?;
        let record_type_raw = read_u16_le(data, offset + 2).ok()?;
        let declared = read_u32_le(data, offset + 4).ok()? as usize;

        let body_start = offset + HEADER_SIZE;
        let body_len = declared.min(data.len() - body_start);
        let body = &data[body_start..body_start + body_len];
        let record_type = PptRecordType::from(record_type_raw);

        let mut record = PptRecord {
            record_type,
            record_type_raw,
            version: options & 0x000F,
            instance: options >> 4,
            data: Vec::new(),
            children: Vec::new(),
        };
        if record_type.is_container() && depth < MAX_DEPTH {
            record.children = parse_records_at(body, depth + 1);
        } else {
            if record_type.is_container() {
                tracing::warn!(
                    "PPT record {:?} nested deeper than {} levels, body kept opaque",
                    record_type,
                    MAX_DEPTH
                );
            }
            record.data = body.to_vec();
        }
        Some((record, HEADER_SIZE + body_len))
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        self.record_type.is_container()
    }

    /// Find a child record of a specific type.
    pub fn find_child(&self, record_type: PptRecordType) -> Option<&PptRecord> {
        self.children
            .iter()
            .find(|child| child.record_type == record_type)
    }

    /// Find all child records of a specific type.
    pub fn find_children(&self, record_type: PptRecordType) -> impl Iterator<Item = &PptRecord> {
        self.children
            .iter()
            .filter(move |child| child.record_type == record_type)
    }

    /// Text carried by a `TextCharsAtom`, `TextBytesAtom` or `CString`.
    ///
    /// A trailing carriage return and NUL terminators are stripped.
    pub fn text(&self) -> Option<String> {
        let text = match self.record_type {
            PptRecordType::TextCharsAtom | PptRecordType::CString => decode_utf16le(&self.data),
            PptRecordType::TextBytesAtom => decode_latin1(&self.data),
            _ => return None,
        };
        Some(
            text.trim_end_matches('\u{0}')
                .trim_end_matches('\r')
                .to_string(),
        )
    }

    /// Replace the text of a text atom, keeping its encoding when possible.
    ///
    /// A `TextBytesAtom` that cannot hold `text` as Latin-1 becomes a
    /// `TextCharsAtom`. Returns `false` for records that carry no text.
    pub fn set_text(&mut self, text: &str) -> bool {
        match self.record_type {
            PptRecordType::TextCharsAtom | PptRecordType::CString => {
                self.data = encode_utf16le(text);
            },
            PptRecordType::TextBytesAtom => match encode_latin1(text) {
                Some(bytes) => self.data = bytes,
                None => {
                    self.record_type = PptRecordType::TextCharsAtom;
                    self.record_type_raw = PptRecordType::TextCharsAtom.as_u16();
                    self.data = encode_utf16le(text);
                },
            },
            _ => return false,
        }
        true
    }

    /// Raw body bytes followed by serialized children; only one of the two
    /// is ever populated.
    fn body_size(&self) -> usize {
        self.data.len() + self.children.iter().map(PptRecord::record_size).sum::<usize>()
    }

    /// Serialized size, header included.
    pub fn record_size(&self) -> usize {
        HEADER_SIZE + self.body_size()
    }

    /// Append the serialized record to `out`.
    pub fn serialize(&self, out: &mut Vec<u8>) {
        let options = (self.version & 0x000F) | (self.instance << 4);
        let header = RecordHeader::new(options, self.record_type_raw, self.body_size() as u32);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.data);
        for child in &self.children {
            child.serialize(out);
        }
    }
}

/// Parse a sequence of sibling PPT records.
///
/// Stops at the first incomplete header; trailing bytes are ignored.
pub fn parse_ppt_records(data: &[u8]) -> Vec<PptRecord> {
    parse_records_at(data, 0)
}

fn parse_records_at(data: &[u8], depth: usize) -> Vec<PptRecord> {
    let mut records = Vec::new();
    let mut offset = 0;
    while let Some((record, consumed)) = PptRecord::parse_at(data, offset, depth) {
        records.push(record);
        offset += consumed;
    }
    records
}

/// Serialize a sequence of sibling PPT records.
pub fn serialize_ppt_records(records: &[PptRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.iter().map(PptRecord::record_size).sum());
    for record in records {
        record.serialize(&mut out);
    }
    out
}
