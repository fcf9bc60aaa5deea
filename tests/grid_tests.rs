use geoshape::{CoordinateSystemConfig, GeometryFactory, Shape};
use proptest::prelude::*;

/// A twelve-pointed star with a square hole.
fn star(f: &GeometryFactory) -> Shape {
    let (mut xs, mut ys) = (Vec::new(), Vec::new());
    for i in 0..24 {
        let r = if i % 2 == 0 { 20.0 } else { 8.0 };
        let a = (i as f64) * std::f64::consts::PI / 12.0;
        xs.push(30.0 + r * a.cos());
        ys.push(10.0 + r * a.sin());
    }
    xs.push(xs[0]);
    ys.push(ys[0]);
    let hole = f
        .polygon(&[28.0, 32.0, 32.0, 28.0, 28.0], &[8.0, 8.0, 12.0, 12.0, 8.0], vec![])
        .unwrap();
    f.polygon(&xs, &ys, vec![hole]).unwrap().into()
}

proptest! {
    #[test]
    fn polygon_grid_matches_exact_test(x in 5.0..55.0f64, y in -15.0..35.0f64) {
        let f = GeometryFactory::geodetic();
        let shape = star(&f);
        let enc = f.encoder();
        let ex = enc.encode_x(x).unwrap();
        let ey = enc.encode_y(y).unwrap();
        let exact = shape.contains_point(enc.decode_x(ex), enc.decode_y(ey));
        prop_assert_eq!(shape.point_inside_encoded(ex, ey).unwrap(), exact);
    }

    #[test]
    fn planar_circle_grid_matches_exact_test(x in -60.0..60.0f64, y in -60.0..60.0f64) {
        let crs = CoordinateSystemConfig::planar(-100.0, 100.0, -100.0, 100.0);
        let f = GeometryFactory::new(crs).unwrap();
        let circle: Shape = f.circle(3.0, -2.0, 45.0).unwrap().into();
        let enc = f.encoder();
        let ex = enc.encode_x(x).unwrap();
        let ey = enc.encode_y(y).unwrap();
        let exact = circle.contains_point(enc.decode_x(ex), enc.decode_y(ey));
        prop_assert_eq!(circle.point_inside_encoded(ex, ey).unwrap(), exact);
    }

    #[test]
    fn polar_circle_grid_matches_exact_test(x in -180.0..180.0f64, y in 55.0..90.0f64) {
        let f = GeometryFactory::geodetic();
        // covers the north pole and crosses the antimeridian
        let circle: Shape = f.circle(178.0, 80.0, 1_500_000.0).unwrap().into();
        let enc = f.encoder();
        let ex = enc.encode_x(x).unwrap();
        let ey = enc.encode_y(y).unwrap();
        let exact = circle.contains_point(enc.decode_x(ex), enc.decode_y(ey));
        prop_assert_eq!(circle.point_inside_encoded(ex, ey).unwrap(), exact);
    }

    #[test]
    fn dateline_circle_grid_matches_exact_test(dx in -12.0..12.0f64, y in -15.0..5.0f64) {
        let f = GeometryFactory::geodetic();
        let circle: Shape = f.circle(-179.0, -5.0, 600_000.0).unwrap().into();
        let x = if -179.0 + dx < -180.0 { dx + 181.0 } else { -179.0 + dx };
        let enc = f.encoder();
        let ex = enc.encode_x(x).unwrap();
        let ey = enc.encode_y(y).unwrap();
        let exact = circle.contains_point(enc.decode_x(ex), enc.decode_y(ey));
        prop_assert_eq!(circle.point_inside_encoded(ex, ey).unwrap(), exact);
    }
}

#[test]
fn test_multi_polygon_grid() {
    let f = GeometryFactory::geodetic();
    let a = f
        .polygon(&[0.0, 1.0, 1.0, 0.0, 0.0], &[0.0, 0.0, 1.0, 1.0, 0.0], vec![])
        .unwrap();
    let b = f
        .polygon(&[10.0, 12.0, 12.0, 10.0, 10.0], &[10.0, 10.0, 12.0, 12.0, 10.0], vec![])
        .unwrap();
    let mp: Shape = f.multi_polygon(vec![a, b]).unwrap().into();
    let enc = f.encoder();
    let at = |x: f64, y: f64| {
        mp.point_inside_encoded(enc.encode_x(x).unwrap(), enc.encode_y(y).unwrap())
            .unwrap()
    };
    assert!(at(0.5, 0.5));
    assert!(at(11.0, 11.5));
    assert!(!at(5.0, 5.0));
    assert!(!at(-50.0, 60.0));
}

#[test]
fn test_grid_is_built_once() {
    let f = GeometryFactory::geodetic();
    let Shape::Polygon(p) = star(&f) else {
        unreachable!()
    };
    let first = p.grid().unwrap() as *const _;
    let second = p.grid().unwrap() as *const _;
    assert_eq!(first, second);
    assert!(p.grid().unwrap().cell_count() <= 64 * 64);
}
