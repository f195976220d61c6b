//! Escher record type registry.
//!
//! Container vs. atom is decided purely by the record type identifier, never
//! by the version nibble of the header.

/// Escher record types.
///
/// Based on the Microsoft Office Drawing specification and Apache POI's
/// `EscherRecordTypes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EscherRecordType {
    /// Unknown or unsupported record type
    Unknown = 0x0000,

    // Container records (0xF000 - 0xF005)
    /// Drawing Group Container
    DggContainer = 0xF000,
    /// Blip Store Container
    BStoreContainer = 0xF001,
    /// Drawing Container
    DgContainer = 0xF002,
    /// Shape Group Container
    SpgrContainer = 0xF003,
    /// Shape Container
    SpContainer = 0xF004,
    /// Solver Container
    SolverContainer = 0xF005,

    // Atom records
    /// File Drawing Group atom
    Dgg = 0xF006,
    /// Blip Store Entry
    BSE = 0xF007,
    /// Drawing atom
    Dg = 0xF008,
    /// Shape Group atom
    Spgr = 0xF009,
    /// Shape atom
    Sp = 0xF00A,
    /// Shape Options
    Opt = 0xF00B,
    /// Textbox
    Textbox = 0xF00C,
    /// Client Textbox (contains text)
    ClientTextbox = 0xF00D,
    /// Anchor
    Anchor = 0xF00E,
    /// Child Anchor
    ChildAnchor = 0xF00F,
    /// Client Anchor
    ClientAnchor = 0xF010,
    /// Client Data
    ClientData = 0xF011,
    /// Connector Rule
    ConnectorRule = 0xF012,
    /// Align Rule
    AlignRule = 0xF013,
    /// Arc Rule
    ArcRule = 0xF014,
    /// Client Rule
    ClientRule = 0xF015,
    /// Class id
    ClassId = 0xF016,
    /// Callout Rule
    CalloutRule = 0xF017,

    // Blip records
    /// EMF Blip
    BlipEmf = 0xF01A,
    /// WMF Blip
    BlipWmf = 0xF01B,
    /// PICT Blip
    BlipPict = 0xF01C,
    /// JPEG Blip
    BlipJpeg = 0xF01D,
    /// PNG Blip
    BlipPng = 0xF01E,
    /// DIB Blip
    BlipDib = 0xF01F,
    /// TIFF Blip
    BlipTiff = 0xF029,
    /// CMYK JPEG Blip
    BlipJpegCmyk = 0xF02A,

    /// Regroup items
    Regroup = 0xF118,
    /// Selection
    Selection = 0xF119,
    /// Color MRU
    ColorMRU = 0xF11A,
    /// Deleted pspl
    DeletedPspl = 0xF11D,
    /// Split Menu Colors
    SplitMenuColors = 0xF11E,
    /// OLE object
    OleObject = 0xF11F,
    /// Color scheme
    ColorScheme = 0xF120,
    /// Secondary Opt (Shape Options)
    SecondaryOpt = 0xF121,
    /// Tertiary Opt
    TertiaryOpt = 0xF122,
}

/// Structural kind of a record, as used by the tree parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Body is a sequence of child records
    Container,
    /// Body is an opaque or fixed-layout payload
    Atom,
}

/// Classify a raw record type identifier.
///
/// Unknown identifiers are atoms.
#[inline]
pub fn classify(record_id: u16) -> RecordKind {
    if EscherRecordType::from(record_id).is_container() {
        RecordKind::Container
    } else {
        RecordKind::Atom
    }
}

impl EscherRecordType {
    /// Check if this is a container record type.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::DggContainer
                | Self::BStoreContainer
                | Self::DgContainer
                | Self::SpgrContainer
                | Self::SpContainer
                | Self::SolverContainer
        )
    }

    /// Check if this is a BLIP (image) record type.
    #[inline]
    pub const fn is_blip(self) -> bool {
        matches!(
            self,
            Self::BlipEmf
                | Self::BlipWmf
                | Self::BlipPict
                | Self::BlipJpeg
                | Self::BlipPng
                | Self::BlipDib
                | Self::BlipTiff
                | Self::BlipJpegCmyk
        )
    }

    /// Human-readable record name, as used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::DggContainer => "DggContainer",
            Self::BStoreContainer => "BStoreContainer",
            Self::DgContainer => "DgContainer",
            Self::SpgrContainer => "SpgrContainer",
            Self::SpContainer => "SpContainer",
            Self::SolverContainer => "SolverContainer",
            Self::Dgg => "Dgg",
            Self::BSE => "BSE",
            Self::Dg => "Dg",
            Self::Spgr => "Spgr",
            Self::Sp => "Sp",
            Self::Opt => "Opt",
            Self::Textbox => "Textbox",
            Self::ClientTextbox => "ClientTextbox",
            Self::Anchor => "Anchor",
            Self::ChildAnchor => "ChildAnchor",
            Self::ClientAnchor => "ClientAnchor",
            Self::ClientData => "ClientData",
            Self::ConnectorRule => "ConnectorRule",
            Self::AlignRule => "AlignRule",
            Self::ArcRule => "ArcRule",
            Self::ClientRule => "ClientRule",
            Self::ClassId => "ClassId",
            Self::CalloutRule => "CalloutRule",
            Self::BlipEmf => "BlipEmf",
            Self::BlipWmf => "BlipWmf",
            Self::BlipPict => "BlipPict",
            Self::BlipJpeg => "BlipJpeg",
            Self::BlipPng => "BlipPng",
            Self::BlipDib => "BlipDib",
            Self::BlipTiff => "BlipTiff",
            Self::BlipJpegCmyk => "BlipJpegCmyk",
            Self::Regroup => "Regroup",
            Self::Selection => "Selection",
            Self::ColorMRU => "ColorMRU",
            Self::DeletedPspl => "DeletedPspl",
            Self::SplitMenuColors => "SplitMenuColors",
            Self::OleObject => "OleObject",
            Self::ColorScheme => "ColorScheme",
            Self::SecondaryOpt => "SecondaryOpt",
            Self::TertiaryOpt => "TertiaryOpt",
        }
    }
}

impl From<u16> for EscherRecordType {
    fn from(value: u16) -> Self {
        match value {
            0xF000 => Self::DggContainer,
            0xF001 => Self::BStoreContainer,
            0xF002 => Self::DgContainer,
            0xF003 => Self::SpgrContainer,
            0xF004 => Self::SpContainer,
            0xF005 => Self::SolverContainer,
            0xF006 => Self::Dgg,
            0xF007 => Self::BSE,
            0xF008 => Self::Dg,
            0xF009 => Self::Spgr,
            0xF00A => Self::Sp,
            0xF00B => Self::Opt,
            0xF00C => Self::Textbox,
            0xF00D => Self::ClientTextbox,
            0xF00E => Self::Anchor,
            0xF00F => Self::ChildAnchor,
            0xF010 => Self::ClientAnchor,
            0xF011 => Self::ClientData,
            0xF012 => Self::ConnectorRule,
            0xF013 => Self::AlignRule,
            0xF014 => Self::ArcRule,
            0xF015 => Self::ClientRule,
            0xF016 => Self::ClassId,
            0xF017 => Self::CalloutRule,
            0xF01A => Self::BlipEmf,
            0xF01B => Self::BlipWmf,
            0xF01C => Self::BlipPict,
            0xF01D => Self::BlipJpeg,
            0xF01E => Self::BlipPng,
            0xF01F => Self::BlipDib,
            0xF029 => Self::BlipTiff,
            0xF02A => Self::BlipJpegCmyk,
            0xF118 => Self::Regroup,
            0xF119 => Self::Selection,
            0xF11A => Self::ColorMRU,
            0xF11D => Self::DeletedPspl,
            0xF11E => Self::SplitMenuColors,
            0xF11F => Self::OleObject,
            0xF120 => Self::ColorScheme,
            0xF121 => Self::SecondaryOpt,
            0xF122 => Self::TertiaryOpt,
            _ => Self::Unknown,
        }
    }
}

impl From<EscherRecordType> for u16 {
    fn from(record_type: EscherRecordType) -> Self {
        record_type as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_containers() {
        for id in 0xF000..=0xF005u16 {
            assert_eq!(classify(id), RecordKind::Container, "0x{id:04X}");
        }
        assert_eq!(classify(0xF00A), RecordKind::Atom);
        assert_eq!(classify(0xF00D), RecordKind::Atom);
    }

    #[test]
    fn test_unknown_is_atom() {
        assert_eq!(EscherRecordType::from(0xF0FF), EscherRecordType::Unknown);
        assert_eq!(classify(0xF0FF), RecordKind::Atom);
        assert_eq!(classify(0x0000), RecordKind::Atom);
    }

    #[test]
    fn test_roundtrip_ids() {
        for id in [0xF002u16, 0xF008, 0xF00B, 0xF011, 0xF029, 0xF122] {
            let ty = EscherRecordType::from(id);
            assert_ne!(ty, EscherRecordType::Unknown);
            assert_eq!(u16::from(ty), id);
        }
    }
}
