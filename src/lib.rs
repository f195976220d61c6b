//! OfficeArt - Escher drawing records and DrawingML shape geometry
//!
//! This library reads and writes the Escher (Office Drawing) record trees
//! embedded in legacy Office files, and evaluates the DrawingML guide
//! formulas and paths that define preset and custom shapes.
//!
//! # Features
//!
//! - **Escher parser**: Length-prefixed record trees with warnings for size anomalies
//! - **PPDrawing**: Slide drawings, text box wrappers and drawing authoring
//! - **Guide evaluator**: Shape guide formulas with cycle detection
//! - **Paths**: Resolve shape outlines into concrete segments
//! - **Presets**: Load preset geometry catalogues (`presets` feature)
//!
//! # Example - Reading a slide drawing
//!
//! ```
//! use officeart::ppt::PPDrawing;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut drawing = PPDrawing::new();
//! let bytes = drawing.to_bytes()?;
//!
//! let parsed = PPDrawing::parse(&bytes)?;
//! for wrapper in parsed.textbox_wrappers() {
//!     println!("Shape {:?}: {}", wrapper.shape_id(), wrapper.text());
//! }
//! assert!(parsed.warnings().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Evaluating guides
//!
//! ```
//! use officeart::geom::{Context, Guide, Rect};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let guides = [Guide::new("dx", "*/ w adj 100000")];
//! let mut ctx = Context::new(Rect::new(0.0, 0.0, 200.0, 100.0));
//! ctx.set_adjust("adj", 25000.0);
//! ctx.add_guides(&guides);
//! assert_eq!(ctx.get_value("dx")?, 50.0);
//! # Ok(())
//! # }
//! ```

/// Shared binary helpers and the crate error type
pub mod common;

/// Escher record layer: record types, parser, tree search and authoring
pub mod escher;

/// PowerPoint drawing records and text box wrappers
pub mod ppt;

/// DrawingML guides, paths and preset geometry
pub mod geom;

pub use common::{Error, Result};
pub use escher::{EscherRecord, ParseWarning, ParsedRecords};
pub use ppt::PPDrawing;
