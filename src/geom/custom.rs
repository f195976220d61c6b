//! Custom shape geometry: adjust values, guides, paths and text rectangle.

use super::context::{Context, Rect};
use super::guide::Guide;
use super::path::{Path, ResolvedPath};
use crate::common::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text rectangle given as guide operand tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRect {
    pub l: String,
    pub t: String,
    pub r: String,
    pub b: String,
}

/// Geometry definition of a preset or custom shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomGeometry {
    /// Adjust value defaults, overridable per shape
    #[serde(default, rename = "avLst")]
    pub adjust_values: Vec<Guide>,
    #[serde(default, rename = "gdLst")]
    pub guides: Vec<Guide>,
    #[serde(default, rename = "pathLst")]
    pub paths: Vec<Path>,
    #[serde(default, rename = "rect")]
    pub text_rect: Option<TextRect>,
}

impl CustomGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_adjust_value(&mut self, guide: Guide) {
        self.adjust_values.push(guide);
    }

    pub fn add_guide(&mut self, guide: Guide) {
        self.guides.push(guide);
    }

    pub fn add_path(&mut self, path: Path) {
        self.paths.push(path);
    }

    /// Context over `bounds` with adjust values and guides loaded.
    ///
    /// `overrides` replaces adjust value defaults by name.
    pub fn context(&self, bounds: Rect, overrides: &HashMap<String, f64>) -> Result<Context<'_>> {
        let mut ctx = Context::new(bounds);
        for adjust in &self.adjust_values {
            let value = match overrides.get(&adjust.name) {
                Some(&value) => value,
                None => adjust.evaluate(&mut ctx)?,
            };
            ctx.set_adjust(adjust.name.clone(), value);
        }
        ctx.add_guides(&self.guides);
        Ok(ctx)
    }

    /// Resolve every path into `anchor`.
    ///
    /// Each path is evaluated in its own context, so a failing path does not
    /// affect the others.
    pub fn resolve(
        &self,
        anchor: Rect,
        overrides: &HashMap<String, f64>,
    ) -> Vec<Result<ResolvedPath>> {
        self.paths
            .iter()
            .map(|path| self.resolve_path(path, anchor, overrides))
            .collect()
    }

    fn resolve_path(
        &self,
        path: &Path,
        anchor: Rect,
        overrides: &HashMap<String, f64>,
    ) -> Result<ResolvedPath> {
        let (width, sx) = path_axis(path.w(), anchor.width);
        let (height, sy) = path_axis(path.h(), anchor.height);
        let mut ctx = self.context(Rect::new(0.0, 0.0, width, height), overrides)?;
        let resolved = path.resolve(&mut ctx).inspect_err(|err| {
            tracing::debug!("Path of custom geometry failed to resolve: {err}");
        })?;
        Ok(resolved.transform(sx, sy, anchor.x, anchor.y))
    }

    /// Resolve the text rectangle into `anchor`.
    pub fn resolve_text_rect(
        &self,
        anchor: Rect,
        overrides: &HashMap<String, f64>,
    ) -> Option<Result<Rect>> {
        let rect = self.text_rect.as_ref()?;
        Some(self.text_rect_in(rect, anchor, overrides))
    }

    fn text_rect_in(
        &self,
        rect: &TextRect,
        anchor: Rect,
        overrides: &HashMap<String, f64>,
    ) -> Result<Rect> {
        let mut ctx = self.context(Rect::new(0.0, 0.0, anchor.width, anchor.height), overrides)?;
        let l = ctx.get_value(&rect.l)?;
        let t = ctx.get_value(&rect.t)?;
        let r = ctx.get_value(&rect.r)?;
        let b = ctx.get_value(&rect.b)?;
        Ok(Rect::new(anchor.x + l, anchor.y + t, r - l, b - t))
    }
}

/// Path space extent and scale for one axis; unset (negative) or empty
/// extents use the anchor extent unscaled.
fn path_axis(extent: i64, anchor: f64) -> (f64, f64) {
    if extent <= 0 {
        (anchor, 1.0)
    } else {
        let extent = extent as f64;
        (extent, anchor / extent)
    }
}
