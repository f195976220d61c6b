//! Guide formula and geometry evaluation through the public API.

use officeart::Error;
use officeart::geom::{
    AdjustPoint, ArcTo, Context, CustomGeometry, Guide, Path, PathCommand, Point, Rect, Segment,
};
use std::collections::HashMap;

fn eval(formula: &str) -> f64 {
    Guide::new("g", formula)
        .evaluate(&mut Context::default())
        .unwrap()
}

#[test]
fn alias_formulas() {
    assert_eq!(eval("+- 10 5 3"), 12.0);
    assert_eq!(eval("*/ 4 3 2"), 6.0);
    assert_eq!(eval("*/ 4 3 0"), 0.0);
}

#[test]
fn pin_clamps_into_range() {
    assert_eq!(eval("pin 5 1 10"), 5.0);
    assert_eq!(eval("pin 5 7 10"), 7.0);
}

#[test]
fn cyclic_guides_fail_without_overflow() {
    let guides = [Guide::new("g1", "+- g2 1 0"), Guide::new("g2", "+- g1 1 0")];
    for name in ["g1", "g2"] {
        let mut ctx = Context::default();
        ctx.add_guides(&guides);
        assert!(matches!(ctx.get_value(name), Err(Error::CyclicGuideReference(_))));
    }
}

#[test]
fn unknown_operator_is_an_error() {
    let guides = [Guide::new("bad", "frob 1 2"), Guide::new("good", "val 3")];
    let mut ctx = Context::default();
    ctx.add_guides(&guides);
    assert!(matches!(ctx.get_value("bad"), Err(Error::UnknownGuideOperator { .. })));
    // Sibling guides are unaffected
    assert_eq!(ctx.get_value("good").unwrap(), 3.0);
}

#[test]
fn rounded_corner_geometry() {
    let mut geometry = CustomGeometry::new();
    geometry.add_adjust_value(Guide::new("adj", "val 16667"));
    geometry.add_guide(Guide::new("a", "pin 0 adj 50000"));
    geometry.add_guide(Guide::new("x1", "*/ ss a 100000"));
    geometry.add_guide(Guide::new("x2", "+- r 0 x1"));

    let mut path = Path::default();
    path.add_command(PathCommand::MoveTo(AdjustPoint::new("x1", "t")));
    path.add_command(PathCommand::LineTo(AdjustPoint::new("x2", "t")));
    path.add_command(PathCommand::Close);
    geometry.add_path(path);

    let anchor = Rect::new(0.0, 0.0, 300.0, 100.0);
    let overrides = HashMap::from([("adj".to_string(), 80000.0)]);
    let resolved = geometry.resolve(anchor, &overrides);
    let segments = &resolved[0].as_ref().unwrap().segments;
    // adj pinned to 50000: corner is half the short side
    assert_eq!(segments[0], Segment::MoveTo(Point::new(50.0, 0.0)));
    assert_eq!(segments[1], Segment::LineTo(Point::new(250.0, 0.0)));
    assert_eq!(segments[2], Segment::Close);
}

#[test]
fn arc_sweep_from_digit_leading_builtin() {
    let mut geometry = CustomGeometry::new();
    let mut path = Path::default();
    path.add_command(PathCommand::MoveTo(AdjustPoint::new("r", "vc")));
    path.add_command(PathCommand::ArcTo(ArcTo {
        wr: "wd2".into(),
        hr: "hd2".into(),
        st_ang: "0".into(),
        sw_ang: "3cd4".into(),
    }));
    geometry.add_path(path);

    let resolved = geometry.resolve(Rect::new(0.0, 0.0, 100.0, 100.0), &HashMap::new());
    let segments = &resolved[0].as_ref().unwrap().segments;
    let Segment::ArcTo(arc) = &segments[1] else {
        panic!("expected an arc, got {:?}", segments[1]);
    };
    assert_eq!(arc.sweep, 270.0);
    assert!((arc.center.x - 50.0).abs() < 1e-9 && (arc.center.y - 50.0).abs() < 1e-9);
    assert!((arc.end.x - 50.0).abs() < 1e-9 && arc.end.y.abs() < 1e-9);
}
