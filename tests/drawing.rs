//! End-to-end tests for slide drawings: parse, edit and write back.

use officeart::escher::writer::{ShapeBuilder, container, dg, shape_type, spgr};
use officeart::escher::{
    EscherClientDataRecord, EscherRecord, EscherRecordType, EscherTextboxRecord, HEADER_SIZE,
    ParseWarning, RecordHeader,
};
use officeart::ppt::{PPDrawing, PptRecord, serialize_ppt_records};
use officeart::{Error, escher};
use zerocopy::IntoBytes;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ppdrawing(body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0x0F, 0x00, 0x0C, 0x04];
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn slide_body() -> Vec<u8> {
    let textbox = EscherTextboxRecord::new(serialize_ppt_records(&[
        PptRecord::atom(officeart::ppt::PptRecordType::TextHeaderAtom, vec![0; 4]),
        PptRecord::text_chars("Quarterly results"),
    ]));
    let record = container(
        EscherRecordType::DgContainer,
        [
            dg(2, 2, 2049),
            container(
                EscherRecordType::SpgrContainer,
                [
                    container(
                        EscherRecordType::SpContainer,
                        [spgr(0, 0, 0, 0), ShapeBuilder::new(shape_type::NOT_PRIMITIVE, 2048).build()],
                    ),
                    container(
                        EscherRecordType::SpContainer,
                        [ShapeBuilder::new(shape_type::TEXT_BOX, 2049).build(), textbox.into()],
                    ),
                ],
            ),
        ],
    );
    record.to_bytes()
}

#[test]
fn write_out_is_byte_identical_without_edits() {
    init_tracing();
    let bytes = ppdrawing(&slide_body());
    let mut drawing = PPDrawing::parse(&bytes).unwrap();
    assert!(drawing.warnings().is_empty());

    let first = drawing.to_bytes().unwrap();
    assert_eq!(first, bytes);
    let second = drawing.to_bytes().unwrap();
    assert_eq!(second, bytes);
}

#[test]
fn parse_inside_larger_buffer() {
    let drawing_bytes = ppdrawing(&slide_body());
    let mut stream = vec![0xEE; 13];
    stream.extend_from_slice(&drawing_bytes);
    stream.extend_from_slice(&[0xEE; 5]);

    let drawing = PPDrawing::from_bytes(&stream, 13, drawing_bytes.len()).unwrap();
    assert_eq!(drawing.textbox_wrappers().len(), 1);
    assert_eq!(drawing.textbox_wrappers()[0].shape_id(), Some(2049));
    assert_eq!(drawing.textbox_wrappers()[0].text(), "Quarterly results");
    assert_eq!(drawing.escher_dg_record().unwrap().drawing_id(), 2);
}

#[test]
fn padding_byte_mismatch_keeps_stream_in_sync() {
    init_tracing();
    // Dg atom declaring one padding byte beyond its fixed layout
    let mut body = vec![0x10, 0x00, 0x08, 0xF0, 0x09, 0x00, 0x00, 0x00];
    body.extend_from_slice(&1u32.to_le_bytes());
    body.extend_from_slice(&1024u32.to_le_bytes());
    body.push(0x00);
    body.extend_from_slice(&slide_body());

    let drawing = PPDrawing::parse(&ppdrawing(&body)).unwrap();
    assert_eq!(drawing.escher_records().len(), 2);
    assert!(matches!(
        drawing.warnings(),
        [ParseWarning::SizeMismatch { offset: 8, declared: 17, reconstructed: 16, .. }]
    ));
    assert_eq!(drawing.textbox_wrappers().len(), 1);
}

#[test]
fn no_textboxes_yields_empty_list() {
    let body = container(
        EscherRecordType::DgContainer,
        [dg(1, 0, 0), container(EscherRecordType::SpgrContainer, [])],
    )
    .to_bytes();
    let drawing = PPDrawing::parse(&ppdrawing(&body)).unwrap();
    assert!(drawing.textbox_wrappers().is_empty());

    let plain = ShapeBuilder::new(shape_type::RECTANGLE, 5).build().to_bytes();
    let drawing = PPDrawing::parse(&ppdrawing(&plain)).unwrap();
    assert!(drawing.textbox_wrappers().is_empty());
}

fn nested_prog_tags(levels: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(levels * HEADER_SIZE);
    for level in 0..levels {
        let body = ((levels - level - 1) * HEADER_SIZE) as u32;
        let header = RecordHeader::new(0x0F, officeart::ppt::PptRecordType::ProgTags.as_u16(), body);
        data.extend_from_slice(header.as_bytes());
    }
    data
}

#[test]
fn deeply_nested_client_records_do_not_overflow() {
    init_tracing();
    let nested = nested_prog_tags(200_000);
    let body = container(
        EscherRecordType::DgContainer,
        [
            dg(1, 1, 1025),
            container(
                EscherRecordType::SpgrContainer,
                [container(
                    EscherRecordType::SpContainer,
                    [
                        ShapeBuilder::new(shape_type::TEXT_BOX, 1025).build(),
                        EscherClientDataRecord { options: 0, data: nested.clone() }.into(),
                        EscherTextboxRecord::new(nested.clone()).into(),
                    ],
                )],
            ),
        ],
    )
    .to_bytes();
    let bytes = ppdrawing(&body);

    let mut drawing = PPDrawing::parse(&bytes).unwrap();
    assert_eq!(drawing.textbox_wrappers().len(), 1);
    assert_eq!(drawing.textbox_wrappers()[0].shape_id(), Some(1025));
    assert!(drawing.textbox_wrappers()[0].style_text_prop9().is_none());
    assert!(drawing.numbered_list_info().is_empty());
    assert_eq!(drawing.to_bytes().unwrap(), bytes);
}

#[test]
fn declared_length_past_end_is_fatal() {
    let mut body = slide_body();
    // Inflate the DgContainer's declared length
    let declared = u32::from_le_bytes([body[4], body[5], body[6], body[7]]) + 64;
    body[4..8].copy_from_slice(&declared.to_le_bytes());

    let err = escher::parse(&body, 0, body.len()).unwrap_err();
    assert!(matches!(
        err,
        Error::DeclaredLengthExceedsBuffer { offset: 0, record_id: 0xF002, .. }
    ));
    assert!(PPDrawing::parse(&ppdrawing(&body)).is_err());
}

#[test]
fn authored_drawing_with_textbox() {
    let mut drawing = PPDrawing::new();
    let textbox = EscherTextboxRecord::new(serialize_ppt_records(&[PptRecord::text_chars("Hi")]));
    drawing.edit_records(|records| {
        let Some(EscherRecord::Container(dg_container)) = records.first_mut() else {
            return;
        };
        let Some(EscherRecord::Container(spgr_container)) = dg_container.children.get_mut(1) else {
            return;
        };
        spgr_container.add_child(container(
            EscherRecordType::SpContainer,
            [ShapeBuilder::new(shape_type::TEXT_BOX, 1025).build(), textbox.into()],
        ));
    });
    if let Some(dg) = drawing.dg_record_mut() {
        dg.num_shapes += 1;
        dg.last_shape_id = 1025;
    }
    assert_eq!(drawing.textbox_wrappers().len(), 1);

    drawing.textbox_wrappers_mut()[0].set_text("Hello again");
    let bytes = drawing.to_bytes().unwrap();
    let reparsed = PPDrawing::parse(&bytes).unwrap();
    assert_eq!(reparsed.textbox_wrappers()[0].text(), "Hello again");
    assert_eq!(reparsed.textbox_wrappers()[0].shape_id(), Some(1025));
    assert_eq!(reparsed.escher_dg_record().unwrap().num_shapes, 2);
}
