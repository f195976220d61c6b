//! Built-in shape guides (DrawingML `ST_ShapeGuide` predefined names).
//!
//! Values derive from the shape bounds, except the angle constants which are
//! in 60000ths of a degree.

use super::context::Rect;
use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinGuide {
    Top,
    Bottom,
    Left,
    Right,
    Width,
    Height,
    HorizontalCenter,
    VerticalCenter,
    LongSide,
    ShortSide,
    /// Constant angle in 60000ths of a degree
    Angle(u32),
    /// Width divided by n
    WidthDiv(u8),
    /// Height divided by n
    HeightDiv(u8),
    /// Short side divided by n
    ShortSideDiv(u8),
}

static BUILTINS: phf::Map<&'static str, BuiltinGuide> = phf_map! {
    "t" => BuiltinGuide::Top,
    "b" => BuiltinGuide::Bottom,
    "l" => BuiltinGuide::Left,
    "r" => BuiltinGuide::Right,
    "w" => BuiltinGuide::Width,
    "h" => BuiltinGuide::Height,
    "hc" => BuiltinGuide::HorizontalCenter,
    "vc" => BuiltinGuide::VerticalCenter,
    "ls" => BuiltinGuide::LongSide,
    "ss" => BuiltinGuide::ShortSide,
    "cd2" => BuiltinGuide::Angle(10_800_000),
    "cd4" => BuiltinGuide::Angle(5_400_000),
    "cd8" => BuiltinGuide::Angle(2_700_000),
    "3cd4" => BuiltinGuide::Angle(16_200_000),
    "3cd8" => BuiltinGuide::Angle(8_100_000),
    "5cd8" => BuiltinGuide::Angle(13_500_000),
    "7cd8" => BuiltinGuide::Angle(18_900_000),
    "wd2" => BuiltinGuide::WidthDiv(2),
    "wd3" => BuiltinGuide::WidthDiv(3),
    "wd4" => BuiltinGuide::WidthDiv(4),
    "wd5" => BuiltinGuide::WidthDiv(5),
    "wd6" => BuiltinGuide::WidthDiv(6),
    "wd8" => BuiltinGuide::WidthDiv(8),
    "wd10" => BuiltinGuide::WidthDiv(10),
    "wd32" => BuiltinGuide::WidthDiv(32),
    "hd2" => BuiltinGuide::HeightDiv(2),
    "hd3" => BuiltinGuide::HeightDiv(3),
    "hd4" => BuiltinGuide::HeightDiv(4),
    "hd5" => BuiltinGuide::HeightDiv(5),
    "hd6" => BuiltinGuide::HeightDiv(6),
    "hd8" => BuiltinGuide::HeightDiv(8),
    "ssd2" => BuiltinGuide::ShortSideDiv(2),
    "ssd4" => BuiltinGuide::ShortSideDiv(4),
    "ssd6" => BuiltinGuide::ShortSideDiv(6),
    "ssd8" => BuiltinGuide::ShortSideDiv(8),
    "ssd16" => BuiltinGuide::ShortSideDiv(16),
    "ssd32" => BuiltinGuide::ShortSideDiv(32),
};

impl BuiltinGuide {
    pub fn lookup(name: &str) -> Option<Self> {
        BUILTINS.get(name).copied()
    }

    pub fn value(self, bounds: &Rect) -> f64 {
        let short_side = bounds.width.min(bounds.height);
        match self {
            Self::Top => bounds.y,
            Self::Bottom => bounds.y + bounds.height,
            Self::Left => bounds.x,
            Self::Right => bounds.x + bounds.width,
            Self::Width => bounds.width,
            Self::Height => bounds.height,
            Self::HorizontalCenter => bounds.x + bounds.width / 2.0,
            Self::VerticalCenter => bounds.y + bounds.height / 2.0,
            Self::LongSide => bounds.width.max(bounds.height),
            Self::ShortSide => short_side,
            Self::Angle(angle) => f64::from(angle),
            Self::WidthDiv(n) => bounds.width / f64::from(n),
            Self::HeightDiv(n) => bounds.height / f64::from(n),
            Self::ShortSideDiv(n) => short_side / f64::from(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_guides() {
        let bounds = Rect::new(10.0, 20.0, 200.0, 100.0);
        let value = |name| BuiltinGuide::lookup(name).unwrap().value(&bounds);
        assert_eq!(value("t"), 20.0);
        assert_eq!(value("b"), 120.0);
        assert_eq!(value("r"), 210.0);
        assert_eq!(value("hc"), 110.0);
        assert_eq!(value("vc"), 70.0);
        assert_eq!(value("ls"), 200.0);
        assert_eq!(value("ssd4"), 25.0);
        assert_eq!(value("wd32"), 6.25);
        assert_eq!(value("3cd4"), 16_200_000.0);
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(BuiltinGuide::lookup("wd7").is_none());
        assert!(BuiltinGuide::lookup("").is_none());
    }
}
