//! Owned Escher record tree.
//!
//! # Format
//!
//! Escher records have an 8-byte little-endian header:
//! - Bytes 0-1: Version (low 4 bits) and Instance (high 12 bits)
//! - Bytes 2-3: Record Type
//! - Bytes 4-7: Record Length (body only, excluding this header)
//!
//! A record is either a container, whose body is a sequence of child
//! records, or an atom. Atoms the drawing layer needs to interpret get a
//! typed variant; every other atom keeps its raw body.

use super::properties::EscherProperties;
use super::types::EscherRecordType;
use super::writer::ShapeFlags;
use crate::common::binary::{BinaryResult, read_i32_le, read_u16_le, read_u32_le};
use crate::ppt::record::{PptRecord, parse_ppt_records};
use zerocopy::{IntoBytes, LE, U16, U32};
use zerocopy_derive::*;

/// Size of every record header.
pub const HEADER_SIZE: usize = 8;

/// Options word of every container record (version 0xF, instance 0).
pub const CONTAINER_OPTIONS: u16 = 0x000F;

/// Escher record header as laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct RecordHeader {
    ver_inst: U16<LE>,
    rec_type: U16<LE>,
    length: U32<LE>,
}

impl RecordHeader {
    pub fn new(options: u16, record_id: u16, length: u32) -> Self {
        Self {
            ver_inst: U16::new(options),
            rec_type: U16::new(record_id),
            length: U32::new(length),
        }
    }

    /// Read a header at `offset`.
    pub fn read(data: &[u8], offset: usize) -> BinaryResult<Self> {
        Ok(Self::new(
            read_u16_le(data, offset)?,
            read_u16_le(data, offset + 2)?,
            read_u32_le(data, offset + 4)?,
        ))
    }

    #[inline]
    pub fn options(&self) -> u16 {
        self.ver_inst.get()
    }

    #[inline]
    pub fn record_id(&self) -> u16 {
        self.rec_type.get()
    }

    /// Declared body length.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    #[inline]
    pub fn version(&self) -> u8 {
        (self.options() & 0x000F) as u8
    }

    #[inline]
    pub fn instance(&self) -> u16 {
        self.options() >> 4
    }
}

#[inline]
fn write_header(out: &mut Vec<u8>, options: u16, record_id: u16, body_len: usize) {
    out.extend_from_slice(RecordHeader::new(options, record_id, body_len as u32).as_bytes());
}

#[inline]
const fn pack_options(version: u8, instance: u16) -> u16 {
    (version as u16 & 0x000F) | (instance << 4)
}

/// Container record: an ordered list of children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherContainerRecord {
    pub options: u16,
    pub record_id: u16,
    pub children: Vec<EscherRecord>,
}

impl EscherContainerRecord {
    pub fn new(record_type: EscherRecordType) -> Self {
        Self {
            options: CONTAINER_OPTIONS,
            record_id: record_type.into(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: impl Into<EscherRecord>) {
        self.children.push(child.into());
    }

    #[inline]
    pub fn record_type(&self) -> EscherRecordType {
        EscherRecordType::from(self.record_id)
    }
}

/// Drawing atom: shape count and last allocated shape id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscherDgRecord {
    pub options: u16,
    pub num_shapes: u32,
    pub last_shape_id: u32,
}

impl EscherDgRecord {
    const BODY_SIZE: usize = 8;

    /// The drawing id lives in the instance field.
    #[inline]
    pub fn drawing_id(&self) -> u16 {
        self.options >> 4
    }

    fn decode(options: u16, body: &[u8]) -> BinaryResult<Self> {
        Ok(Self {
            options,
            num_shapes: read_u32_le(body, 0)?,
            last_shape_id: read_u32_le(body, 4)?,
        })
    }
}

/// Shape atom: shape id and shape flags; shape type in the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscherSpRecord {
    pub options: u16,
    pub shape_id: u32,
    pub flags: ShapeFlags,
}

impl EscherSpRecord {
    const BODY_SIZE: usize = 8;

    pub fn new(shape_type: u16, shape_id: u32, flags: ShapeFlags) -> Self {
        Self {
            options: pack_options(0x02, shape_type),
            shape_id,
            flags,
        }
    }

    /// MSOSPT shape type from the instance field.
    #[inline]
    pub fn shape_type(&self) -> u16 {
        self.options >> 4
    }

    fn decode(options: u16, body: &[u8]) -> BinaryResult<Self> {
        Ok(Self {
            options,
            shape_id: read_u32_le(body, 0)?,
            flags: ShapeFlags::from_bits_retain(read_u32_le(body, 4)?),
        })
    }
}

/// Group shape coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EscherSpgrRecord {
    pub options: u16,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl EscherSpgrRecord {
    const BODY_SIZE: usize = 16;

    fn decode(options: u16, body: &[u8]) -> BinaryResult<Self> {
        Ok(Self {
            options,
            left: read_i32_le(body, 0)?,
            top: read_i32_le(body, 4)?,
            right: read_i32_le(body, 8)?,
            bottom: read_i32_le(body, 12)?,
        })
    }
}

/// Shape options; the instance field holds the property count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherOptRecord {
    /// Version bits only; the instance is derived from the property count
    pub options: u16,
    pub properties: EscherProperties,
}

impl EscherOptRecord {
    pub fn new() -> Self {
        Self {
            options: pack_options(0x03, 0),
            properties: EscherProperties::new(),
        }
    }

    /// Options word as written: version kept, instance = property count.
    fn written_options(&self) -> u16 {
        pack_options((self.options & 0x000F) as u8, self.properties.len() as u16)
    }
}

impl Default for EscherOptRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Client textbox atom: embedded PowerPoint text records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherTextboxRecord {
    pub options: u16,
    pub data: Vec<u8>,
}

impl EscherTextboxRecord {
    pub fn new(data: Vec<u8>) -> Self {
        Self { options: 0, data }
    }

    /// Parse the embedded PowerPoint records.
    pub fn ppt_records(&self) -> Vec<PptRecord> {
        parse_ppt_records(&self.data)
    }
}

/// Client data atom: embedded PowerPoint records (placeholders, tags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherClientDataRecord {
    pub options: u16,
    pub data: Vec<u8>,
}

impl EscherClientDataRecord {
    /// Parse the embedded PowerPoint records.
    pub fn ppt_records(&self) -> Vec<PptRecord> {
        parse_ppt_records(&self.data)
    }
}

/// Any other atom, kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherAtomRecord {
    pub options: u16,
    pub record_id: u16,
    pub data: Vec<u8>,
}

/// A node of the Escher record tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscherRecord {
    Container(EscherContainerRecord),
    Dg(EscherDgRecord),
    Sp(EscherSpRecord),
    Spgr(EscherSpgrRecord),
    Opt(EscherOptRecord),
    ClientTextbox(EscherTextboxRecord),
    ClientData(EscherClientDataRecord),
    Atom(EscherAtomRecord),
}

/// Outcome of decoding an atom body.
pub(crate) enum AtomDecode {
    /// Decoded (typed, or opaque for atoms without a fixed layout)
    Typed(EscherRecord),
    /// Body too short for the type's fixed layout; kept opaque
    Short(EscherRecord),
}

impl EscherRecord {
    /// Decode an atom body into its typed variant.
    ///
    /// Bodies too short for a fixed layout come back as opaque atoms.
    pub(crate) fn decode_atom(header: &RecordHeader, body: &[u8]) -> AtomDecode {
        let options = header.options();
        let record_id = header.record_id();
        let opaque = || {
            EscherRecord::Atom(EscherAtomRecord {
                options,
                record_id,
                data: body.to_vec(),
            })
        };
        let typed = match EscherRecordType::from(record_id) {
            EscherRecordType::Dg => EscherDgRecord::decode(options, body).ok().map(Self::Dg),
            EscherRecordType::Sp => EscherSpRecord::decode(options, body).ok().map(Self::Sp),
            EscherRecordType::Spgr => EscherSpgrRecord::decode(options, body).ok().map(Self::Spgr),
            EscherRecordType::Opt => EscherProperties::parse(body, header.instance() as usize)
                .map(|properties| {
                    Self::Opt(EscherOptRecord {
                        options: options & 0x000F,
                        properties,
                    })
                }),
            EscherRecordType::ClientTextbox => Some(Self::ClientTextbox(EscherTextboxRecord {
                options,
                data: body.to_vec(),
            })),
            EscherRecordType::ClientData => Some(Self::ClientData(EscherClientDataRecord {
                options,
                data: body.to_vec(),
            })),
            _ => return AtomDecode::Typed(opaque()),
        };
        match typed {
            Some(record) => AtomDecode::Typed(record),
            None => AtomDecode::Short(opaque()),
        }
    }

    /// Raw record type identifier.
    pub fn record_id(&self) -> u16 {
        match self {
            Self::Container(c) => c.record_id,
            Self::Dg(_) => EscherRecordType::Dg.into(),
            Self::Sp(_) => EscherRecordType::Sp.into(),
            Self::Spgr(_) => EscherRecordType::Spgr.into(),
            Self::Opt(_) => EscherRecordType::Opt.into(),
            Self::ClientTextbox(_) => EscherRecordType::ClientTextbox.into(),
            Self::ClientData(_) => EscherRecordType::ClientData.into(),
            Self::Atom(a) => a.record_id,
        }
    }

    #[inline]
    pub fn record_type(&self) -> EscherRecordType {
        EscherRecordType::from(self.record_id())
    }

    /// Options word (version and instance) as it will be written.
    pub fn options(&self) -> u16 {
        match self {
            Self::Container(c) => c.options,
            Self::Dg(r) => r.options,
            Self::Sp(r) => r.options,
            Self::Spgr(r) => r.options,
            Self::Opt(r) => r.written_options(),
            Self::ClientTextbox(r) => r.options,
            Self::ClientData(r) => r.options,
            Self::Atom(a) => a.options,
        }
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Child records; empty for atoms.
    pub fn children(&self) -> &[EscherRecord] {
        match self {
            Self::Container(c) => &c.children,
            _ => &[],
        }
    }

    /// Mutable child list; `None` for atoms.
    pub fn children_mut(&mut self) -> Option<&mut Vec<EscherRecord>> {
        match self {
            Self::Container(c) => Some(&mut c.children),
            _ => None,
        }
    }

    fn body_size(&self) -> usize {
        match self {
            Self::Container(c) => c.children.iter().map(EscherRecord::record_size).sum(),
            Self::Dg(_) => EscherDgRecord::BODY_SIZE,
            Self::Sp(_) => EscherSpRecord::BODY_SIZE,
            Self::Spgr(_) => EscherSpgrRecord::BODY_SIZE,
            Self::Opt(r) => r.properties.body_size(),
            Self::ClientTextbox(r) => r.data.len(),
            Self::ClientData(r) => r.data.len(),
            Self::Atom(a) => a.data.len(),
        }
    }

    /// Reconstructed serialized size, header included.
    pub fn record_size(&self) -> usize {
        HEADER_SIZE + self.body_size()
    }

    /// Append the serialized record to `out`; returns the bytes written.
    pub fn serialize(&self, out: &mut Vec<u8>) -> usize {
        let start = out.len();
        write_header(out, self.options(), self.record_id(), self.body_size());
        match self {
            Self::Container(c) => {
                for child in &c.children {
                    child.serialize(out);
                }
            },
            Self::Dg(r) => {
                out.extend_from_slice(&r.num_shapes.to_le_bytes());
                out.extend_from_slice(&r.last_shape_id.to_le_bytes());
            },
            Self::Sp(r) => {
                out.extend_from_slice(&r.shape_id.to_le_bytes());
                out.extend_from_slice(&r.flags.bits().to_le_bytes());
            },
            Self::Spgr(r) => {
                for v in [r.left, r.top, r.right, r.bottom] {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            },
            Self::Opt(r) => r.properties.write_body(out),
            Self::ClientTextbox(r) => out.extend_from_slice(&r.data),
            Self::ClientData(r) => out.extend_from_slice(&r.data),
            Self::Atom(a) => out.extend_from_slice(&a.data),
        }
        out.len() - start
    }

    /// Serialize into a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.record_size());
        self.serialize(&mut out);
        out
    }
}

/// Typed view over [`EscherRecord`] variants, used by the search primitives.
pub trait RecordVariant {
    fn from_record(record: &EscherRecord) -> Option<&Self>;
    fn from_record_mut(record: &mut EscherRecord) -> Option<&mut Self>;
}

impl RecordVariant for EscherRecord {
    #[inline]
    fn from_record(record: &EscherRecord) -> Option<&Self> {
        Some(record)
    }

    #[inline]
    fn from_record_mut(record: &mut EscherRecord) -> Option<&mut Self> {
        Some(record)
    }
}

macro_rules! record_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl RecordVariant for $ty {
                #[inline]
                fn from_record(record: &EscherRecord) -> Option<&Self> {
                    match record {
                        EscherRecord::$variant(r) => Some(r),
                        _ => None,
                    }
                }

                #[inline]
                fn from_record_mut(record: &mut EscherRecord) -> Option<&mut Self> {
                    match record {
                        EscherRecord::$variant(r) => Some(r),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for EscherRecord {
                #[inline]
                fn from(record: $ty) -> Self {
                    EscherRecord::$variant(record)
                }
            }
        )*
    };
}

record_variant! {
    Container => EscherContainerRecord,
    Dg => EscherDgRecord,
    Sp => EscherSpRecord,
    Spgr => EscherSpgrRecord,
    Opt => EscherOptRecord,
    ClientTextbox => EscherTextboxRecord,
    ClientData => EscherClientDataRecord,
    Atom => EscherAtomRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> EscherRecord {
        let header = RecordHeader::read(bytes, 0).unwrap();
        match EscherRecord::decode_atom(&header, &bytes[HEADER_SIZE..]) {
            AtomDecode::Typed(r) | AtomDecode::Short(r) => r,
        }
    }

    #[test]
    fn test_header_fields() {
        let data = [0x2F, 0x01, 0x0A, 0xF0, 0x08, 0x00, 0x00, 0x00];
        let header = RecordHeader::read(&data, 0).unwrap();
        assert_eq!(header.version(), 0x0F);
        assert_eq!(header.instance(), 0x012);
        assert_eq!(header.record_id(), 0xF00A);
        assert_eq!(header.length(), 8);
        assert_eq!(header.as_bytes(), &data);
    }

    #[test]
    fn test_parse_sp_atom() {
        let data = [
            0x12, 0x00, // version=2, instance=1 (rectangle)
            0x0A, 0xF0, // Sp
            0x08, 0x00, 0x00, 0x00, // length = 8
            0x00, 0x04, 0x00, 0x00, // spid = 1024
            0x00, 0x0A, 0x00, 0x00, // flags = HAVE_ANCHOR | HAVE_SPT
        ];
        let record = decode(&data);
        let EscherRecord::Sp(sp) = &record else {
            panic!("expected Sp, got {record:?}");
        };
        assert_eq!(sp.shape_id, 1024);
        assert_eq!(sp.shape_type(), 1);
        assert!(sp.flags.contains(ShapeFlags::HAVE_ANCHOR | ShapeFlags::HAVE_SPT));
        assert_eq!(record.to_bytes(), data);
    }

    #[test]
    fn test_short_sp_is_opaque() {
        let data = [0x02, 0x00, 0x0A, 0xF0, 0x04, 0x00, 0x00, 0x00, 1, 2, 3, 4];
        let header = RecordHeader::read(&data, 0).unwrap();
        assert!(matches!(
            EscherRecord::decode_atom(&header, &data[8..]),
            AtomDecode::Short(EscherRecord::Atom(_))
        ));
    }

    #[test]
    fn test_container_size_and_serialize() {
        let mut container = EscherContainerRecord::new(EscherRecordType::SpContainer);
        container.add_child(EscherSpRecord::new(1, 1025, ShapeFlags::HAVE_SPT));
        let record = EscherRecord::from(container);
        assert_eq!(record.record_size(), 24);
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..4], &[0x0F, 0x00, 0x04, 0xF0]);
        assert_eq!(&bytes[4..8], &16u32.to_le_bytes());
    }

    #[test]
    fn test_variant_views() {
        let record = EscherRecord::from(EscherDgRecord {
            options: 0x0010,
            num_shapes: 3,
            last_shape_id: 1027,
        });
        assert_eq!(EscherDgRecord::from_record(&record).unwrap().drawing_id(), 1);
        assert!(EscherSpRecord::from_record(&record).is_none());
    }
}
