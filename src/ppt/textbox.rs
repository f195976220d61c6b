//! Text box wrapper over a `ClientTextbox` atom.
//!
//! The wrapper exposes the PPT records embedded in the atom, tracks the owning
//! shape id and PPT9 style runs, and buffers text edits until the drawing is
//! written out.

use super::consts::PptRecordType;
use super::record::{PptRecord, parse_ppt_records, serialize_ppt_records};
use crate::escher::container::RecordPath;
use crate::escher::record::{EscherRecord, EscherTextboxRecord};

/// Wrapper around the embedded records of one text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherTextboxWrapper {
    /// Backing atom in the drawing's record tree; `None` when detached
    location: Option<RecordPath>,
    /// Raw atom body as last parsed or flushed
    data: Vec<u8>,
    /// Embedded PPT records
    child_records: Vec<PptRecord>,
    /// Child records changed since `data` was captured
    dirty: bool,
    shape_id: Option<u32>,
    style_text_prop9: Option<PptRecord>,
}

impl EscherTextboxWrapper {
    /// Create a detached wrapper from textbox body bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            location: None,
            child_records: parse_ppt_records(&data),
            data,
            dirty: false,
            shape_id: None,
            style_text_prop9: None,
        }
    }

    /// Create a wrapper backed by the atom at `location`.
    pub(crate) fn attached(location: RecordPath, record: &EscherTextboxRecord) -> Self {
        Self {
            location: Some(location),
            ..Self::new(record.data.clone())
        }
    }

    /// Path of the backing `ClientTextbox` atom, if attached.
    pub fn location(&self) -> Option<&RecordPath> {
        self.location.as_ref()
    }

    pub fn shape_id(&self) -> Option<u32> {
        self.shape_id
    }

    pub fn set_shape_id(&mut self, shape_id: u32) {
        self.shape_id = Some(shape_id);
    }

    /// Extended style runs found through the shape's PPT9 binary tag.
    pub fn style_text_prop9(&self) -> Option<&PptRecord> {
        self.style_text_prop9.as_ref()
    }

    pub fn set_style_text_prop9(&mut self, atom: PptRecord) {
        self.style_text_prop9 = Some(atom);
    }

    pub fn child_records(&self) -> &[PptRecord] {
        &self.child_records
    }

    /// Find a StyleTextPropAtom record.
    pub fn find_style_text_prop_atom(&self) -> Option<&PptRecord> {
        self.child_records
            .iter()
            .find(|r| r.record_type == PptRecordType::StyleTextPropAtom)
    }

    /// Text of the text atoms, one line per atom.
    pub fn text(&self) -> String {
        self.child_records
            .iter()
            .filter_map(PptRecord::text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the text of the first text atom, adding a `TextCharsAtom`
    /// when the box has none.
    pub fn set_text(&mut self, text: &str) {
        let atom = self.child_records.iter_mut().find(|r| {
            matches!(
                r.record_type,
                PptRecordType::TextCharsAtom | PptRecordType::TextBytesAtom
            )
        });
        match atom {
            Some(atom) => {
                atom.set_text(text);
            },
            None => self.child_records.push(PptRecord::text_chars(text)),
        }
        self.dirty = true;
    }

    /// Whether there are edits not yet flushed into the record tree.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Raw body as last parsed or flushed.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Current body bytes; unmodified wrappers return the original bytes.
    pub fn serialize(&self) -> Vec<u8> {
        if self.dirty {
            serialize_ppt_records(&self.child_records)
        } else {
            self.data.clone()
        }
    }

    /// Build a new `ClientTextbox` atom from this wrapper.
    pub fn to_record(&self) -> EscherTextboxRecord {
        EscherTextboxRecord::new(self.serialize())
    }

    /// Write pending edits into the backing atom of `records`.
    ///
    /// Detached wrappers only settle their own buffer.
    pub(crate) fn flush_into(&mut self, records: &mut [EscherRecord]) {
        if !self.dirty {
            return;
        }
        self.data = serialize_ppt_records(&self.child_records);
        self.dirty = false;

        let Some(location) = &self.location else {
            return;
        };
        match location.resolve_mut(records) {
            Some(EscherRecord::ClientTextbox(atom)) => atom.data.clone_from(&self.data),
            _ => tracing::warn!(
                "Textbox wrapper location {:?} no longer points at a ClientTextbox",
                location.indices()
            ),
        }
    }
}
