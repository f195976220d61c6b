//! Escher shape property table (Opt record).
//!
//! Properties can be simple (4-byte value) or complex (variable-length data).
//! The 6-byte property headers come first; complex data follows in header
//! order. Based on MS-ODRAW section 2.3.

use crate::common::binary::{read_u16_le, read_u32_le};
use smallvec::SmallVec;

// Property ID flags (from MS-ODRAW)
const IS_COMPLEX: u16 = 0x8000;
const PROPERTY_ID_MASK: u16 = 0x3FFF;

/// Property numbers used when authoring drawings.
///
/// The actual property number is stored in the lower 14 bits of the id.
pub mod property_id {
    /// Fill color (RGB)
    pub const FILL_COLOR: u16 = 0x0181;
    /// Fill back color (RGB)
    pub const FILL_BACK_COLOR: u16 = 0x0183;
    /// Fill rectangle right
    pub const FILL_RECT_RIGHT: u16 = 0x0193;
    /// Fill rectangle bottom
    pub const FILL_RECT_BOTTOM: u16 = 0x0194;
    /// Fill boolean flags (no fill hit test)
    pub const NO_FILL_HIT_TEST: u16 = 0x01BF;
    /// Line boolean flags (no line draw dash)
    pub const NO_LINE_DRAW_DASH: u16 = 0x01FF;
    /// Black and white rendering mode
    pub const BLACK_AND_WHITE_SETTINGS: u16 = 0x0304;
    /// Shape boolean flags (background shape)
    pub const BACKGROUND_SHAPE: u16 = 0x033F;
}

/// A single property entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherProperty {
    /// Raw id including the blip/complex flag bits
    pub id: u16,
    /// Simple value, or the byte length of `complex` for complex properties
    pub value: u32,
    /// Complex payload (empty for simple properties)
    pub complex: Vec<u8>,
}

impl EscherProperty {
    /// Create a simple property.
    pub const fn simple(id: u16, value: u32) -> Self {
        Self {
            id,
            value,
            complex: Vec::new(),
        }
    }

    /// Create a complex property carrying `data`.
    pub fn complex(id: u16, data: Vec<u8>) -> Self {
        Self {
            id: id | IS_COMPLEX,
            value: data.len() as u32,
            complex: data,
        }
    }

    /// Property number without flag bits.
    #[inline]
    pub const fn number(&self) -> u16 {
        self.id & PROPERTY_ID_MASK
    }

    #[inline]
    pub const fn is_complex(&self) -> bool {
        self.id & IS_COMPLEX != 0
    }
}

/// Decoded Opt record body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscherProperties {
    properties: SmallVec<[EscherProperty; 8]>,
    /// Bytes after the last complex payload, kept for exact re-serialization
    trailing: Vec<u8>,
}

impl EscherProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `count` properties from an Opt body.
    ///
    /// Returns `None` when the header table does not fit. A complex payload
    /// that runs past the body is truncated to what is present.
    pub fn parse(body: &[u8], count: usize) -> Option<Self> {
        let header_size = count.checked_mul(6)?;
        if header_size > body.len() {
            return None;
        }

        let mut properties: SmallVec<[EscherProperty; 8]> = SmallVec::with_capacity(count);
        for i in 0..count {
            let id = read_u16_le(body, i * 6).ok()?;
            let value = read_u32_le(body, i * 6 + 2).ok()?;
            properties.push(EscherProperty {
                id,
                value,
                complex: Vec::new(),
            });
        }

        let mut offset = header_size;
        for property in properties.iter_mut().filter(|p| p.is_complex()) {
            let end = offset.saturating_add(property.value as usize).min(body.len());
            property.complex = body[offset..end].to_vec();
            offset = end;
        }

        Some(Self {
            properties,
            trailing: body[offset..].to_vec(),
        })
    }

    /// Append a property.
    pub fn push(&mut self, property: EscherProperty) {
        self.properties.push(property);
    }

    /// Number of properties (the Opt record's instance field).
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EscherProperty> {
        self.properties.iter()
    }

    /// Look up a property by number, ignoring flag bits.
    pub fn get(&self, number: u16) -> Option<&EscherProperty> {
        let number = number & PROPERTY_ID_MASK;
        self.properties.iter().find(|p| p.number() == number)
    }

    /// Serialized body length.
    pub fn body_size(&self) -> usize {
        self.properties.len() * 6
            + self
                .properties
                .iter()
                .map(|p| p.complex.len())
                .sum::<usize>()
            + self.trailing.len()
    }

    /// Serialize the body (headers, then complex data).
    pub fn write_body(&self, out: &mut Vec<u8>) {
        for property in &self.properties {
            out.extend_from_slice(&property.id.to_le_bytes());
            out.extend_from_slice(&property.value.to_le_bytes());
        }
        for property in &self.properties {
            out.extend_from_slice(&property.complex);
        }
        out.extend_from_slice(&self.trailing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_and_complex() {
        let mut body = Vec::new();
        body.extend_from_slice(&0x0181u16.to_le_bytes());
        body.extend_from_slice(&0x0800_0004u32.to_le_bytes());
        body.extend_from_slice(&(0x0145u16 | 0x8000).to_le_bytes());
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend_from_slice(&[1, 2, 3]);

        let props = EscherProperties::parse(&body, 2).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get(property_id::FILL_COLOR).unwrap().value, 0x0800_0004);
        let vertices = props.get(0x0145).unwrap();
        assert!(vertices.is_complex());
        assert_eq!(vertices.complex, vec![1, 2, 3]);

        let mut out = Vec::new();
        props.write_body(&mut out);
        assert_eq!(out, body);
        assert_eq!(props.body_size(), body.len());
    }

    #[test]
    fn test_header_table_too_short() {
        assert!(EscherProperties::parse(&[0u8; 5], 1).is_none());
    }

    #[test]
    fn test_trailing_bytes_preserved() {
        let mut body = Vec::new();
        body.extend_from_slice(&0x0304u16.to_le_bytes());
        body.extend_from_slice(&9u32.to_le_bytes());
        body.push(0xEE);

        let props = EscherProperties::parse(&body, 1).unwrap();
        let mut out = Vec::new();
        props.write_body(&mut out);
        assert_eq!(out, body);
    }
}
