//! Escher record authoring utilities.
//!
//! Builders that produce typed records for new drawings. Based on MS-ODRAW.

use super::properties::{EscherProperties, EscherProperty};
use super::record::{
    EscherContainerRecord, EscherDgRecord, EscherOptRecord, EscherRecord, EscherSpRecord,
    EscherSpgrRecord,
};
use super::types::EscherRecordType;
use bitflags::bitflags;

// =============================================================================
// Shape Flags (MS-ODRAW 2.2.40)
// =============================================================================

bitflags! {
    /// Shape flags for EscherSpRecord (MS-ODRAW 2.2.40)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShapeFlags: u32 {
        /// Shape is a group
        const GROUP = 0x0001;
        /// Shape is a child of a group
        const CHILD = 0x0002;
        /// Shape is the topmost group (patriarch)
        const PATRIARCH = 0x0004;
        /// Shape has been deleted
        const DELETED = 0x0008;
        /// Shape is an OLE object
        const OLE_SHAPE = 0x0010;
        /// Shape has a valid master
        const HAVE_MASTER = 0x0020;
        /// Shape is flipped horizontally
        const FLIP_H = 0x0040;
        /// Shape is flipped vertically
        const FLIP_V = 0x0080;
        /// Shape is a connector
        const CONNECTOR = 0x0100;
        /// Shape has an anchor
        const HAVE_ANCHOR = 0x0200;
        /// Shape is a background shape
        const BACKGROUND = 0x0400;
        /// Shape has a shape type property
        const HAVE_SPT = 0x0800;
    }
}

// =============================================================================
// Shape Type Constants (MS-ODRAW 2.4.6 MSOSPT)
// =============================================================================

pub mod shape_type {
    pub const NOT_PRIMITIVE: u16 = 0;
    pub const RECTANGLE: u16 = 1;
    pub const ROUND_RECTANGLE: u16 = 2;
    pub const ELLIPSE: u16 = 3;
    pub const DIAMOND: u16 = 4;
    pub const LINE: u16 = 20;
    pub const TEXT_BOX: u16 = 202;
}

// =============================================================================
// Property Value Constants
// =============================================================================

pub mod prop_value {
    pub const SCHEME_COLOR: u32 = 0x0800_0000;
    pub const SCHEME_FILL: u32 = SCHEME_COLOR | 0x04;
    pub const SCHEME_FILL_BACK: u32 = SCHEME_COLOR;
    pub const SCHEME_LINE: u32 = SCHEME_COLOR | 0x01;
    pub const SCHEME_SHADOW: u32 = SCHEME_COLOR | 0x02;
    pub const SCHEME_BACKGROUND: u32 = SCHEME_COLOR | 0x05;
    pub const LINE_STYLE_DEFAULT: u32 = 0x0010_0010;
    pub const SHAPE_BOOL_DEFAULT: u32 = 0x0008_0008;
}

/// Build a container record from its children.
pub fn container(
    record_type: EscherRecordType,
    children: impl IntoIterator<Item = EscherRecord>,
) -> EscherRecord {
    let mut c = EscherContainerRecord::new(record_type);
    c.children.extend(children);
    EscherRecord::Container(c)
}

/// Build a Dg atom for drawing `drawing_id`.
pub fn dg(drawing_id: u16, num_shapes: u32, last_shape_id: u32) -> EscherRecord {
    EscherRecord::Dg(EscherDgRecord {
        options: drawing_id << 4,
        num_shapes,
        last_shape_id,
    })
}

/// Build an Spgr atom (group shape coordinates).
pub fn spgr(left: i32, top: i32, right: i32, bottom: i32) -> EscherRecord {
    EscherRecord::Spgr(EscherSpgrRecord {
        options: 0x0001,
        left,
        top,
        right,
        bottom,
    })
}

/// Helper to build shape records.
pub struct ShapeBuilder {
    shape_type: u16,
    shape_id: u32,
    flags: ShapeFlags,
}

impl ShapeBuilder {
    pub fn new(shape_type: u16, shape_id: u32) -> Self {
        Self {
            shape_type,
            shape_id,
            flags: ShapeFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: ShapeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> EscherRecord {
        EscherRecord::Sp(EscherSpRecord::new(
            self.shape_type,
            self.shape_id,
            self.flags,
        ))
    }
}

/// Helper to build property records (Opt records).
#[derive(Default)]
pub struct PropertyBuilder {
    properties: EscherProperties,
}

impl PropertyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a simple property.
    pub fn add_simple(mut self, property_id: u16, value: u32) -> Self {
        self.properties.push(EscherProperty::simple(property_id, value));
        self
    }

    /// Add a complex property.
    pub fn add_complex(mut self, property_id: u16, data: Vec<u8>) -> Self {
        self.properties.push(EscherProperty::complex(property_id, data));
        self
    }

    pub fn build(self) -> EscherRecord {
        let mut opt = EscherOptRecord::new();
        opt.properties = self.properties;
        EscherRecord::Opt(opt)
    }
}
