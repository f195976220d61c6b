//! DrawingML shape geometry.
//!
//! Guides are named formulas over adjust values, other guides and the
//! built-in bounds guides. Paths reference guides for their coordinates and
//! resolve into concrete segments inside a shape anchor.

pub mod builtin;
pub mod guide;
pub mod context;
pub mod path;
pub mod custom;
pub mod preset;

pub use builtin::BuiltinGuide;
pub use guide::{Guide, GuideOp, OOXML_DEGREE};
pub use context::{Context, Rect};
pub use path::{
    AdjustPoint, Arc, ArcTo, PaintModifier, Path, PathCommand, PathCommandKind, Point,
    ResolvedPath, Segment,
};
pub use custom::{CustomGeometry, TextRect};
pub use preset::{PresetGeometries, PresetGeometryLoader};
#[cfg(feature = "presets")]
pub use preset::YamlPresetLoader;
