//! PowerPoint drawing records.
//!
//! [`PPDrawing`] owns the Escher tree of a slide and the text boxes found in
//! it. Text boxes and client data carry ordinary PPT records, modelled by
//! [`PptRecord`].

pub mod consts;
pub mod record;
pub mod textbox;
pub mod drawing;

pub use consts::PptRecordType;
pub use record::{PptRecord, parse_ppt_records, serialize_ppt_records};
pub use textbox::EscherTextboxWrapper;
pub use drawing::PPDrawing;
