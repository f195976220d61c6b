// PowerPoint Binary File Format (MS-PPT) constants used inside drawings

/// PPT record types found in drawing client records (based on POI RecordTypes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PptRecordType {
    /// Unknown record type
    Unknown = 0,
    /// Drawing record wrapping the Escher tree of a slide or notes page
    PPDrawing = 1036,
    /// Placeholder atom
    OEPlaceholderAtom = 3011,
    /// Text header atom (text type)
    TextHeaderAtom = 3999,
    /// UTF-16LE text atom
    TextCharsAtom = 4000,
    /// Paragraph and character style runs
    StyleTextPropAtom = 4001,
    /// Latin-1 text atom
    TextBytesAtom = 4008,
    /// Text special info atom
    TextSpecInfoAtom = 4010,
    /// Extended (PPT9) style runs, bullets and numbering
    StyleTextProp9Atom = 4012,
    /// Text ruler atom
    TextRulerAtom = 4006,
    /// UTF-16LE string
    CString = 4026,
    /// Interactive info atom
    InteractiveInfoAtom = 4083,
    /// Programmable tags container
    ProgTags = 5000,
    /// String-valued programmable tag
    ProgStringTag = 5001,
    /// Binary programmable tag
    ProgBinaryTag = 5002,
    /// Payload of a binary tag
    BinaryTagDataBlob = 5003,
}

impl From<u16> for PptRecordType {
    fn from(value: u16) -> Self {
        match value {
            1036 => PptRecordType::PPDrawing,
            3011 => PptRecordType::OEPlaceholderAtom,
            3999 => PptRecordType::TextHeaderAtom,
            4000 => PptRecordType::TextCharsAtom,
            4001 => PptRecordType::StyleTextPropAtom,
            4006 => PptRecordType::TextRulerAtom,
            4008 => PptRecordType::TextBytesAtom,
            4010 => PptRecordType::TextSpecInfoAtom,
            4012 => PptRecordType::StyleTextProp9Atom,
            4026 => PptRecordType::CString,
            4083 => PptRecordType::InteractiveInfoAtom,
            5000 => PptRecordType::ProgTags,
            5001 => PptRecordType::ProgStringTag,
            5002 => PptRecordType::ProgBinaryTag,
            5003 => PptRecordType::BinaryTagDataBlob,
            _ => PptRecordType::Unknown,
        }
    }
}

impl PptRecordType {
    /// Get the u16 value of this record type
    #[inline]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether records of this type hold child records.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            PptRecordType::ProgTags
                | PptRecordType::ProgStringTag
                | PptRecordType::ProgBinaryTag
                | PptRecordType::BinaryTagDataBlob
        )
    }
}

/// Tag name marking the PPT9 extension blob in a binary tag.
pub const PPT9_TAG: &str = "___PPT9";
