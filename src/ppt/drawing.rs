//! PPDrawing: the Escher drawing of a slide or notes page.
//!
//! Based on Apache POI's HSLF `PPDrawing`. The record pretends to be an atom
//! in the PowerPoint record stream; its body is a sequence of Escher records,
//! normally a single `DgContainer`.
//!
//! Text boxes are discovered in one of two ways:
//!
//! - With a `DgContainer`: every `SpContainer` directly inside an
//!   `SpgrContainer` directly inside it yields one wrapper if it has a
//!   `ClientTextbox` child. The shape id comes from its `Sp` child and the
//!   PPT9 style runs from its `ClientData` child.
//! - Without one: every `ClientTextbox` anywhere in the tree, associated with
//!   the last `Sp` atom that precedes it among its siblings.

use super::consts::{PPT9_TAG, PptRecordType};
use super::record::PptRecord;
use super::textbox::EscherTextboxWrapper;
use crate::common::binary::put_u32_le;
use crate::common::error::{Error, Result};
use crate::escher::container::{Found, RecordPath, Walk, find_all, find_first};
use crate::escher::parser::{EscherParser, ParseOptions, ParseWarning};
use crate::escher::properties::property_id;
use crate::escher::record::{
    EscherClientDataRecord, EscherContainerRecord, EscherDgRecord, EscherRecord, EscherSpRecord,
    EscherTextboxRecord, HEADER_SIZE, RecordHeader, RecordVariant,
};
use crate::escher::types::EscherRecordType;
use crate::escher::writer::{
    PropertyBuilder, ShapeBuilder, ShapeFlags, container, dg, shape_type, spgr,
};
use once_cell::unsync::OnceCell;
use std::io::Write;
use zerocopy::IntoBytes;

/// Header options of a PPDrawing record.
const PPDRAWING_OPTIONS: u16 = 0x000F;

/// Escher drawing of one slide or notes page.
#[derive(Debug, Clone)]
pub struct PPDrawing {
    header: [u8; HEADER_SIZE],
    records: Vec<EscherRecord>,
    textbox_wrappers: Vec<EscherTextboxWrapper>,
    /// Location of the `Dg` atom, computed on first use
    dg: OnceCell<Option<RecordPath>>,
    warnings: Vec<ParseWarning>,
}

impl Default for PPDrawing {
    fn default() -> Self {
        Self::new()
    }
}

impl PPDrawing {
    /// Create a drawing for a new slide: a drawing container holding the
    /// patriarch group and a background shape.
    pub fn new() -> Self {
        let header = RecordHeader::new(PPDRAWING_OPTIONS, PptRecordType::PPDrawing.as_u16(), 0);
        let mut header_bytes = [0u8; HEADER_SIZE];
        header_bytes.copy_from_slice(header.as_bytes());
        Self {
            header: header_bytes,
            records: vec![default_dg_container()],
            textbox_wrappers: Vec::new(),
            dg: OnceCell::new(),
            warnings: Vec::new(),
        }
    }

    /// Parse a drawing from a whole PPDrawing record (header included).
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::from_bytes(data, 0, data.len())
    }

    /// Parse the PPDrawing record occupying `source[start..start + len]`.
    pub fn from_bytes(source: &[u8], start: usize, len: usize) -> Result<Self> {
        Self::from_bytes_with_options(source, start, len, ParseOptions::default())
    }

    pub fn from_bytes_with_options(
        source: &[u8],
        start: usize,
        len: usize,
        options: ParseOptions,
    ) -> Result<Self> {
        let available = source.len().saturating_sub(start);
        if len < HEADER_SIZE || available < len {
            return Err(Error::TruncatedInput {
                offset: start,
                needed: len.max(HEADER_SIZE),
                available,
            });
        }
        if len > options.max_record_length {
            return Err(Error::RecordTooLarge {
                length: len,
                max: options.max_record_length,
            });
        }

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&source[start..start + HEADER_SIZE]);

        let parsed = EscherParser::with_options(source, options)
            .parse(start + HEADER_SIZE, len - HEADER_SIZE)?;
        let textbox_wrappers = find_textbox_wrappers(&parsed.records);
        Ok(Self {
            header,
            records: parsed.records,
            textbox_wrappers,
            dg: OnceCell::new(),
            warnings: parsed.warnings,
        })
    }

    /// Record type from the header (1036 for drawings read from a file).
    pub fn record_type(&self) -> u16 {
        u16::from_le_bytes([self.header[2], self.header[3]])
    }

    /// The top-level Escher records.
    pub fn escher_records(&self) -> &[EscherRecord] {
        &self.records
    }

    /// Anomalies found while parsing.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// The first top-level `DgContainer`.
    pub fn drawing_group_container(&self) -> Option<&EscherContainerRecord> {
        find_dg_container(&self.records).map(|found| found.record)
    }

    pub fn textbox_wrappers(&self) -> &[EscherTextboxWrapper] {
        &self.textbox_wrappers
    }

    pub fn textbox_wrappers_mut(&mut self) -> &mut [EscherTextboxWrapper] {
        &mut self.textbox_wrappers
    }

    /// Register a wrapper; the record tree is left untouched.
    pub fn add_textbox_wrapper(&mut self, wrapper: EscherTextboxWrapper) {
        self.textbox_wrappers.push(wrapper);
    }

    /// The `Dg` atom tracking shape count and last shape id.
    pub fn escher_dg_record(&self) -> Option<&EscherDgRecord> {
        self.dg_path()
            .and_then(|path| path.resolve(&self.records))
            .and_then(EscherDgRecord::from_record)
    }

    pub fn dg_record_mut(&mut self) -> Option<&mut EscherDgRecord> {
        let path = self.dg_path()?.clone();
        path.resolve_mut(&mut self.records)
            .and_then(EscherDgRecord::from_record_mut)
    }

    fn dg_path(&self) -> Option<&RecordPath> {
        self.dg
            .get_or_init(|| {
                let dg_container = find_dg_container(&self.records)?;
                find_first::<EscherDgRecord, _>(direct_children(&dg_container), |_| true)
                    .map(|found| found.path)
            })
            .as_ref()
    }

    /// PPT9 style atoms of every shape in the drawing container.
    pub fn numbered_list_info(&self) -> Vec<PptRecord> {
        let Some(dg_container) = find_dg_container(&self.records) else {
            return Vec::new();
        };
        shape_containers(&dg_container)
            .filter_map(|sp| find_style_text_prop9(&sp))
            .collect()
    }

    /// Append a top-level record.
    pub fn push_record(&mut self, record: EscherRecord) {
        self.edit_records(|records| records.push(record));
    }

    /// Remove the top-level record at `index`.
    pub fn remove_record(&mut self, index: usize) -> Option<EscherRecord> {
        self.edit_records(|records| (index < records.len()).then(|| records.remove(index)))
    }

    /// Edit the record tree in place.
    ///
    /// Pending text edits are flushed first. Afterwards the `Dg` cache is
    /// dropped and tree-backed text box wrappers are rebuilt; detached
    /// wrappers are kept.
    pub fn edit_records<R>(&mut self, edit: impl FnOnce(&mut Vec<EscherRecord>) -> R) -> R {
        self.flush_textboxes();
        let result = edit(&mut self.records);
        self.dg.take();

        let detached: Vec<_> = self
            .textbox_wrappers
            .drain(..)
            .filter(|wrapper| wrapper.location().is_none())
            .collect();
        self.textbox_wrappers = find_textbox_wrappers(&self.records);
        self.textbox_wrappers.extend(detached);
        result
    }

    fn flush_textboxes(&mut self) {
        for wrapper in &mut self.textbox_wrappers {
            wrapper.flush_into(&mut self.records);
        }
    }

    /// Write the record: pending text edits are flushed, the header length
    /// is recomputed, then header and children are written.
    pub fn write_out<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.flush_textboxes();

        let new_size: usize = self.records.iter().map(EscherRecord::record_size).sum();
        put_u32_le(&mut self.header, 4, new_size as u32)?;
        out.write_all(&self.header)?;

        let mut body = Vec::with_capacity(new_size);
        for record in &self.records {
            record.serialize(&mut body);
        }
        out.write_all(&body)?;
        Ok(())
    }

    /// Serialize into a fresh buffer.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_out(&mut out)?;
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a PPDrawing {
    type Item = &'a EscherRecord;
    type IntoIter = std::slice::Iter<'a, EscherRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn default_dg_container() -> EscherRecord {
    let patriarch = container(
        EscherRecordType::SpContainer,
        [
            spgr(0, 0, 0, 0),
            ShapeBuilder::new(shape_type::NOT_PRIMITIVE, 0)
                .with_flags(ShapeFlags::PATRIARCH | ShapeFlags::GROUP)
                .build(),
        ],
    );
    let background = container(
        EscherRecordType::SpContainer,
        [
            ShapeBuilder::new(shape_type::RECTANGLE, 0)
                .with_flags(ShapeFlags::BACKGROUND | ShapeFlags::HAVE_SPT)
                .build(),
            PropertyBuilder::new()
                .add_simple(property_id::FILL_COLOR, 134_217_728)
                .add_simple(property_id::FILL_BACK_COLOR, 134_217_733)
                .add_simple(property_id::FILL_RECT_RIGHT, 10_064_750)
                .add_simple(property_id::FILL_RECT_BOTTOM, 7_778_750)
                .add_simple(property_id::NO_FILL_HIT_TEST, 1_179_666)
                .add_simple(property_id::NO_LINE_DRAW_DASH, 524_288)
                .add_simple(property_id::BLACK_AND_WHITE_SETTINGS, 9)
                .add_simple(property_id::BACKGROUND_SHAPE, 65_537)
                .build(),
        ],
    );
    container(
        EscherRecordType::DgContainer,
        [
            dg(1, 1, 0),
            container(EscherRecordType::SpgrContainer, [patriarch]),
            background,
        ],
    )
}

/// Walk over the direct children of a found container.
fn direct_children<'a>(parent: &Found<'a, EscherContainerRecord>) -> Walk<'a> {
    Walk::under(parent.path.clone(), &parent.record.children).max_depth(1)
}

fn containers_of_type<'a>(
    walk: Walk<'a>,
    record_type: EscherRecordType,
) -> impl Iterator<Item = Found<'a, EscherContainerRecord>> {
    find_all::<EscherContainerRecord, _>(walk, move |c| c.record_type() == record_type)
}

fn find_dg_container(records: &[EscherRecord]) -> Option<Found<'_, EscherContainerRecord>> {
    containers_of_type(Walk::new(records).max_depth(1), EscherRecordType::DgContainer).next()
}

/// `SpContainer`s directly inside the `SpgrContainer`s of a drawing container.
fn shape_containers<'a>(
    dg_container: &Found<'a, EscherContainerRecord>,
) -> impl Iterator<Item = Found<'a, EscherContainerRecord>> {
    containers_of_type(direct_children(dg_container), EscherRecordType::SpgrContainer).flat_map(
        |spgr| containers_of_type(direct_children(&spgr), EscherRecordType::SpContainer),
    )
}

fn find_textbox_wrappers(records: &[EscherRecord]) -> Vec<EscherTextboxWrapper> {
    match find_dg_container(records) {
        Some(dg_container) => shape_containers(&dg_container)
            .filter_map(|sp| textbox_wrapper_for_shape(&sp))
            .collect(),
        None => scan_textboxes(records),
    }
}

fn textbox_wrapper_for_shape(
    sp_container: &Found<'_, EscherContainerRecord>,
) -> Option<EscherTextboxWrapper> {
    let textbox = find_first::<EscherTextboxRecord, _>(direct_children(sp_container), |_| true)?;
    let mut wrapper = EscherTextboxWrapper::attached(textbox.path, textbox.record);

    if let Some(style) = find_style_text_prop9(sp_container) {
        wrapper.set_style_text_prop9(style);
    }
    if let Some(sp) = find_first::<EscherSpRecord, _>(direct_children(sp_container), |_| true) {
        wrapper.set_shape_id(sp.record.shape_id);
    }
    Some(wrapper)
}

/// Every `ClientTextbox` in the tree, with the id of the last `Sp` atom
/// preceding it in the same container.
fn scan_textboxes(records: &[EscherRecord]) -> Vec<EscherTextboxWrapper> {
    find_all::<EscherTextboxRecord, _>(Walk::new(records), |_| true)
        .map(|textbox| {
            let shape_id = textbox.path.split_last().and_then(|(parent, index)| {
                parent.children(records)?[..index]
                    .iter()
                    .rev()
                    .find_map(EscherSpRecord::from_record)
                    .map(|sp| sp.shape_id)
            });
            let mut wrapper = EscherTextboxWrapper::attached(textbox.path, textbox.record);
            if let Some(shape_id) = shape_id {
                wrapper.set_shape_id(shape_id);
            }
            wrapper
        })
        .collect()
}

/// Follow `ClientData` → `ProgTags` → `ProgBinaryTag` to the PPT9 style atom.
fn find_style_text_prop9(sp_container: &Found<'_, EscherContainerRecord>) -> Option<PptRecord> {
    let client_data =
        find_first::<EscherClientDataRecord, _>(direct_children(sp_container), |_| true)?;
    client_data
        .record
        .ppt_records()
        .into_iter()
        .filter(|record| record.record_type == PptRecordType::ProgTags)
        .flat_map(|tags| tags.children)
        .filter(|tag| tag.record_type == PptRecordType::ProgBinaryTag)
        .find_map(style_from_binary_tag)
}

/// A PPT9 binary tag holds exactly a `CString` name and a data blob.
fn style_from_binary_tag(tag: PptRecord) -> Option<PptRecord> {
    let [name, blob] = <[PptRecord; 2]>::try_from(tag.children).ok()?;
    if name.record_type != PptRecordType::CString
        || blob.record_type != PptRecordType::BinaryTagDataBlob
        || name.text().as_deref() != Some(PPT9_TAG)
    {
        return None;
    }
    blob.children
        .into_iter()
        .find(|record| record.record_type == PptRecordType::StyleTextProp9Atom)
}
