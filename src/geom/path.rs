//! Shape path model.
//!
//! A [`Path`] keeps its commands in document order and also indexes them by
//! kind. Command coordinates are operand tokens; [`Path::resolve`] turns them
//! into concrete segments through a [`Context`].

use super::context::Context;
use super::guide::OOXML_DEGREE;
use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Point whose coordinates are guide operand tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustPoint {
    pub x: String,
    pub y: String,
}

impl AdjustPoint {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    fn resolve(&self, ctx: &mut Context<'_>) -> Result<Point> {
        Ok(Point::new(ctx.get_value(&self.x)?, ctx.get_value(&self.y)?))
    }
}

/// Elliptical arc starting at the current point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcTo {
    /// Horizontal radius
    pub wr: String,
    /// Vertical radius
    pub hr: String,
    /// Start angle, 60000ths of a degree
    #[serde(rename = "stAng")]
    pub st_ang: String,
    /// Sweep angle, 60000ths of a degree
    #[serde(rename = "swAng")]
    pub sw_ang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo(AdjustPoint),
    #[serde(rename = "lnTo")]
    LineTo(AdjustPoint),
    ArcTo(ArcTo),
    #[serde(rename = "quadBezTo")]
    QuadTo([AdjustPoint; 2]),
    #[serde(rename = "cubicBezTo")]
    CurveTo([AdjustPoint; 3]),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathCommandKind {
    MoveTo,
    LineTo,
    ArcTo,
    QuadTo,
    CurveTo,
    Close,
}

impl PathCommandKind {
    /// DrawingML element name.
    pub fn name(self) -> &'static str {
        match self {
            Self::MoveTo => "moveTo",
            Self::LineTo => "lnTo",
            Self::ArcTo => "arcTo",
            Self::QuadTo => "quadBezTo",
            Self::CurveTo => "cubicBezTo",
            Self::Close => "close",
        }
    }
}

impl PathCommand {
    pub fn kind(&self) -> PathCommandKind {
        match self {
            Self::MoveTo(_) => PathCommandKind::MoveTo,
            Self::LineTo(_) => PathCommandKind::LineTo,
            Self::ArcTo(_) => PathCommandKind::ArcTo,
            Self::QuadTo(_) => PathCommandKind::QuadTo,
            Self::CurveTo(_) => PathCommandKind::CurveTo,
            Self::Close => PathCommandKind::Close,
        }
    }
}

/// Fill mode of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaintModifier {
    None,
    #[default]
    Norm,
    Lighten,
    LightenLess,
    Darken,
    DarkenLess,
}

/// Ordered path commands with fill and stroke settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PathDef", into = "PathDef")]
pub struct Path {
    commands: Vec<PathCommand>,
    /// Indices into `commands`, one list per command kind
    by_kind: [Vec<usize>; 6],
    fill: PaintModifier,
    stroke: bool,
    w: i64,
    h: i64,
}

impl Default for Path {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Path {
    pub fn new(fill: bool, stroke: bool) -> Self {
        Self {
            commands: Vec::new(),
            by_kind: Default::default(),
            fill: if fill {
                PaintModifier::Norm
            } else {
                PaintModifier::None
            },
            stroke,
            w: -1,
            h: -1,
        }
    }

    pub fn add_command(&mut self, command: PathCommand) {
        self.by_kind[command.kind() as usize].push(self.commands.len());
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Commands of one kind, in document order.
    pub fn commands_of(&self, kind: PathCommandKind) -> impl Iterator<Item = &PathCommand> {
        self.by_kind[kind as usize].iter().map(|&i| &self.commands[i])
    }

    pub fn fill(&self) -> PaintModifier {
        self.fill
    }

    pub fn set_fill(&mut self, fill: PaintModifier) {
        self.fill = fill;
    }

    pub fn is_filled(&self) -> bool {
        self.fill != PaintModifier::None
    }

    pub fn is_stroked(&self) -> bool {
        self.stroke
    }

    pub fn set_stroke(&mut self, stroke: bool) {
        self.stroke = stroke;
    }

    /// Path coordinate space width; -1 when unset.
    pub fn w(&self) -> i64 {
        self.w
    }

    /// Path coordinate space height; -1 when unset.
    pub fn h(&self) -> i64 {
        self.h
    }

    pub fn set_size(&mut self, w: i64, h: i64) {
        self.w = w;
        self.h = h;
    }

    /// Resolve every command, in order, against `ctx`.
    pub fn resolve(&self, ctx: &mut Context<'_>) -> Result<ResolvedPath> {
        let mut segments = Vec::with_capacity(self.commands.len());
        let mut current: Option<Point> = None;
        let mut subpath_start: Option<Point> = None;

        for command in &self.commands {
            let require = |point: Option<Point>| {
                point.ok_or(Error::MissingCurrentPoint(command.kind().name()))
            };
            let segment = match command {
                PathCommand::MoveTo(pt) => {
                    let pt = pt.resolve(ctx)?;
                    subpath_start = Some(pt);
                    Segment::MoveTo(pt)
                },
                PathCommand::LineTo(pt) => {
                    require(current)?;
                    Segment::LineTo(pt.resolve(ctx)?)
                },
                PathCommand::ArcTo(arc) => Segment::ArcTo(resolve_arc(arc, require(current)?, ctx)?),
                PathCommand::QuadTo([p1, p2]) => {
                    require(current)?;
                    Segment::QuadTo(p1.resolve(ctx)?, p2.resolve(ctx)?)
                },
                PathCommand::CurveTo([p1, p2, p3]) => {
                    require(current)?;
                    Segment::CurveTo(p1.resolve(ctx)?, p2.resolve(ctx)?, p3.resolve(ctx)?)
                },
                PathCommand::Close => {
                    require(current)?;
                    Segment::Close
                },
            };
            current = match &segment {
                Segment::Close => subpath_start,
                other => other.end_point(),
            };
            segments.push(segment);
        }

        Ok(ResolvedPath {
            segments,
            fill: self.fill,
            stroke: self.stroke,
        })
    }
}

fn resolve_arc(arc: &ArcTo, from: Point, ctx: &mut Context<'_>) -> Result<Arc> {
    let rx = ctx.get_value(&arc.wr)?;
    let ry = ctx.get_value(&arc.hr)?;
    let start = ctx.get_value(&arc.st_ang)? / OOXML_DEGREE;
    let sweep = ctx.get_value(&arc.sw_ang)? / OOXML_DEGREE;

    // Angles are visual angles; convert to the ellipse parameter
    let param = |degrees: f64| {
        let rad = degrees.to_radians();
        (rx * rad.sin()).atan2(ry * rad.cos())
    };
    let inv_start = param(start);
    let center = Point::new(from.x - rx * inv_start.cos(), from.y - ry * inv_start.sin());
    let inv_end = param(start + sweep);
    let end = Point::new(center.x + rx * inv_end.cos(), center.y + ry * inv_end.sin());

    Ok(Arc {
        center,
        rx,
        ry,
        start,
        sweep,
        end,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathDef {
    #[serde(default)]
    fill: PaintModifier,
    #[serde(default = "default_stroke")]
    stroke: bool,
    #[serde(default = "unset_size")]
    w: i64,
    #[serde(default = "unset_size")]
    h: i64,
    #[serde(default)]
    commands: Vec<PathCommand>,
}

fn default_stroke() -> bool {
    true
}

fn unset_size() -> i64 {
    -1
}

impl From<PathDef> for Path {
    fn from(def: PathDef) -> Self {
        let mut path = Path::new(true, def.stroke);
        path.fill = def.fill;
        path.set_size(def.w, def.h);
        for command in def.commands {
            path.add_command(command);
        }
        path
    }
}

impl From<Path> for PathDef {
    fn from(path: Path) -> Self {
        Self {
            fill: path.fill,
            stroke: path.stroke,
            w: path.w,
            h: path.h,
            commands: path.commands,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Resolved elliptical arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// Start angle in degrees
    pub start: f64,
    /// Sweep angle in degrees, positive clockwise
    pub sweep: f64,
    pub end: Point,
}

/// One resolved path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    ArcTo(Arc),
    QuadTo(Point, Point),
    CurveTo(Point, Point, Point),
    Close,
}

impl Segment {
    /// Where the segment leaves the pen; `None` for close.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::QuadTo(_, p) | Self::CurveTo(_, _, p) => {
                Some(p)
            },
            Self::ArcTo(arc) => Some(arc.end),
            Self::Close => None,
        }
    }

    /// Map every point through `f`; arc radii are scaled by `sx`/`sy`.
    pub fn map(self, sx: f64, sy: f64, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(f(p)),
            Self::LineTo(p) => Self::LineTo(f(p)),
            Self::ArcTo(arc) => Self::ArcTo(Arc {
                center: f(arc.center),
                rx: arc.rx * sx,
                ry: arc.ry * sy,
                end: f(arc.end),
                ..arc
            }),
            Self::QuadTo(p1, p2) => Self::QuadTo(f(p1), f(p2)),
            Self::CurveTo(p1, p2, p3) => Self::CurveTo(f(p1), f(p2), f(p3)),
            Self::Close => Self::Close,
        }
    }
}

/// Concrete geometry of one path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub segments: Vec<Segment>,
    pub fill: PaintModifier,
    pub stroke: bool,
}

impl ResolvedPath {
    pub fn is_filled(&self) -> bool {
        self.fill != PaintModifier::None
    }

    /// Scale by `sx`/`sy`, then translate by `dx`/`dy`.
    pub fn transform(mut self, sx: f64, sy: f64, dx: f64, dy: f64) -> Self {
        for segment in &mut self.segments {
            *segment = segment.map(sx, sy, |p| Point::new(dx + p.x * sx, dy + p.y * sy));
        }
        self
    }
}
