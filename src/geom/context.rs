//! Evaluation context for guide formulas.
//!
//! Operand tokens resolve in this order: literal number, already evaluated
//! guide, adjust value, guide definition (evaluated on demand), built-in
//! guide. Guide definitions are evaluated lazily with a visited set, so a
//! cycle fails with [`Error::CyclicGuideReference`] instead of recursing.

use super::builtin::BuiltinGuide;
use super::guide::Guide;
use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default limit for nested guide evaluation.
pub const MAX_GUIDE_DEPTH: usize = 256;

/// Axis aligned rectangle in shape coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Named values visible to guide formulas of one shape or path.
#[derive(Debug, Clone)]
pub struct Context<'g> {
    bounds: Rect,
    adjusts: HashMap<String, f64>,
    guides: HashMap<&'g str, &'g Guide>,
    evaluated: HashMap<String, f64>,
    in_progress: HashSet<String>,
    max_depth: usize,
}

impl Default for Context<'_> {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl<'g> Context<'g> {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            adjusts: HashMap::new(),
            guides: HashMap::new(),
            evaluated: HashMap::new(),
            in_progress: HashSet::new(),
            max_depth: MAX_GUIDE_DEPTH,
        }
    }

    /// Limit how deeply guides may reference other guides.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_adjust(&mut self, name: impl Into<String>, value: f64) {
        self.adjusts.insert(name.into(), value);
    }

    /// Make a guide definition available for on-demand evaluation.
    ///
    /// A later definition with the same name replaces an earlier one.
    pub fn add_guide(&mut self, guide: &'g Guide) {
        self.guides.insert(guide.name.as_str(), guide);
    }

    pub fn add_guides(&mut self, guides: impl IntoIterator<Item = &'g Guide>) {
        for guide in guides {
            self.add_guide(guide);
        }
    }

    /// Evaluate `guide` and remember its value under its name.
    pub fn evaluate(&mut self, guide: &Guide) -> Result<f64> {
        if !self.in_progress.insert(guide.name.clone()) {
            return Err(Error::CyclicGuideReference(guide.name.clone()));
        }
        if self.in_progress.len() > self.max_depth {
            self.in_progress.remove(&guide.name);
            return Err(Error::CyclicGuideReference(guide.name.clone()));
        }
        let result = guide.evaluate(self);
        self.in_progress.remove(&guide.name);

        let value = result?;
        self.evaluated.insert(guide.name.clone(), value);
        Ok(value)
    }

    /// Resolve an operand token.
    pub fn get_value(&mut self, token: &str) -> Result<f64> {
        // Built-in names such as `3cd4` start with a digit too.
        if looks_numeric(token)
            && let Ok(value) = fast_float2::parse::<f64, _>(token)
        {
            return Ok(value);
        }
        if let Some(&value) = self.evaluated.get(token) {
            return Ok(value);
        }
        if let Some(&value) = self.adjusts.get(token) {
            return Ok(value);
        }
        if let Some(&guide) = self.guides.get(token) {
            return self.evaluate(guide);
        }
        if let Some(builtin) = BuiltinGuide::lookup(token) {
            return Ok(builtin.value(&self.bounds));
        }
        Err(Error::UnknownGuideReference(token.to_string()))
    }
}

fn looks_numeric(token: &str) -> bool {
    token
        .as_bytes()
        .first()
        .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_and_builtins() {
        let mut ctx = Context::new(Rect::new(0.0, 0.0, 400.0, 200.0));
        assert_eq!(ctx.get_value("12.5").unwrap(), 12.5);
        assert_eq!(ctx.get_value("-3").unwrap(), -3.0);
        assert_eq!(ctx.get_value("wd2").unwrap(), 200.0);
        assert_eq!(ctx.get_value("ss").unwrap(), 200.0);
        assert!(matches!(ctx.get_value("nope"), Err(Error::UnknownGuideReference(_))));
        assert!(matches!(ctx.get_value("1x"), Err(Error::UnknownGuideReference(_))));
    }

    #[test]
    fn test_digit_leading_builtins() {
        let mut ctx = Context::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(ctx.get_value("3cd4").unwrap(), 16_200_000.0);
        assert_eq!(ctx.get_value("3cd8").unwrap(), 8_100_000.0);
        assert_eq!(ctx.get_value("5cd8").unwrap(), 13_500_000.0);
        assert_eq!(ctx.get_value("7cd8").unwrap(), 18_900_000.0);

        let guide = Guide::new("g", "sin 100 3cd4");
        assert!((guide.evaluate(&mut ctx).unwrap() + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_digit_leading_guide_name() {
        let guides = [Guide::new("2x", "*/ w 2 1")];
        let mut ctx = Context::new(Rect::new(0.0, 0.0, 30.0, 10.0));
        ctx.add_guides(&guides);
        assert_eq!(ctx.get_value("2x").unwrap(), 60.0);
        assert_eq!(ctx.get_value("2").unwrap(), 2.0);
    }

    #[test]
    fn test_lazy_guides_any_order() {
        let guides = [
            Guide::new("x2", "*/ x1 2 1"),
            Guide::new("x1", "+- w 0 adj"),
        ];
        let mut ctx = Context::new(Rect::new(0.0, 0.0, 100.0, 50.0));
        ctx.set_adjust("adj", 10.0);
        ctx.add_guides(&guides);
        assert_eq!(ctx.get_value("x2").unwrap(), 180.0);
        assert_eq!(ctx.get_value("x1").unwrap(), 90.0);
    }

    #[test]
    fn test_adjust_shadows_builtin() {
        let mut ctx = Context::default();
        ctx.set_adjust("w", 7.0);
        assert_eq!(ctx.get_value("w").unwrap(), 7.0);
    }

    #[test]
    fn test_cycle_detected() {
        let guides = [Guide::new("g1", "val g2"), Guide::new("g2", "val g1")];
        let mut ctx = Context::default();
        ctx.add_guides(&guides);
        for guide in &guides {
            assert!(matches!(
                ctx.evaluate(guide),
                Err(Error::CyclicGuideReference(_))
            ));
        }
        let self_ref = Guide::new("g", "+- g 1 0");
        assert!(matches!(
            Context::default().evaluate(&self_ref),
            Err(Error::UnknownGuideReference(_)) | Err(Error::CyclicGuideReference(_))
        ));
    }

    #[test]
    fn test_depth_limit() {
        let guides: Vec<_> = (0..10)
            .map(|i| Guide::new(format!("g{i}"), format!("+- g{} 1 0", i + 1)))
            .chain(std::iter::once(Guide::new("g10", "val 0")))
            .collect();
        let mut shallow = Context::default().with_max_depth(4);
        shallow.add_guides(&guides);
        assert!(shallow.get_value("g0").is_err());

        let mut ctx = Context::default();
        ctx.add_guides(&guides);
        assert_eq!(ctx.get_value("g0").unwrap(), 10.0);
    }
}
