use geoshape::{
    CoordinateSystemConfig, DistanceMetric, GeometryFactory, Rectangle, Relation, Shape,
    SpatialOperation, distance_between,
};
use proptest::prelude::*;

fn square(f: &GeometryFactory, min: f64, max: f64) -> geoshape::Polygon {
    f.polygon(&[min, max, max, min, min], &[min, min, max, max, min], vec![])
        .unwrap()
}

fn arb_rect() -> impl Strategy<Value = Rectangle> {
    (-180.0..180.0f64, 0.0..90.0f64, -90.0..90.0f64, 0.0..45.0f64).prop_map(
        |(x, w, y, h)| {
            // rectangles reaching past +180 wrap around the antimeridian
            let max_x = if x + w > 180.0 { x + w - 360.0 } else { x + w };
            let max_y = (y + h).min(90.0);
            Rectangle::new(x, max_x, y, max_y)
        },
    )
}

proptest! {
    #[test]
    fn rectangle_relations_transpose(a in arb_rect(), b in arb_rect()) {
        prop_assume!(a != b);
        let ab = Shape::Rectangle(a).relate(&Shape::Rectangle(b)).unwrap();
        let ba = Shape::Rectangle(b).relate(&Shape::Rectangle(a)).unwrap();
        prop_assert_eq!(ab, ba.transpose());
    }

    #[test]
    fn polygon_and_rectangle_relations_transpose(r in arb_rect()) {
        let f = GeometryFactory::geodetic();
        let hole = square(&f, 10.0, 20.0);
        let poly: Shape = f
            .polygon(&[0.0, 40.0, 40.0, 0.0, 0.0], &[0.0, 0.0, 30.0, 30.0, 0.0], vec![hole])
            .unwrap()
            .into();
        let rect = Shape::Rectangle(r);
        prop_assert_eq!(poly.relate(&rect).unwrap(), rect.relate(&poly).unwrap().transpose());
    }
}

#[test]
fn test_polygon_areas() {
    let f = GeometryFactory::geodetic();
    let unit: Shape = square(&f, 0.0, 1.0).into();
    assert_eq!(unit.area().unwrap(), 1.0);

    let hole = f
        .polygon(&[0.5, 1.5, 1.5, 0.5, 0.5], &[0.5, 0.5, 1.5, 1.5, 0.5], vec![])
        .unwrap();
    let holed: Shape = f
        .polygon(&[0.0, 2.0, 2.0, 0.0, 0.0], &[0.0, 0.0, 2.0, 2.0, 0.0], vec![hole])
        .unwrap()
        .into();
    assert_eq!(holed.area().unwrap(), 3.0);

    // winding does not matter
    let clockwise: Shape = f
        .polygon(&[0.0, 0.0, 1.0, 1.0, 0.0], &[0.0, 1.0, 1.0, 0.0, 0.0], vec![])
        .unwrap()
        .into();
    assert_eq!(clockwise.area().unwrap(), 1.0);

    let line: Shape = f.line(&[0.0, 1.0], &[0.0, 1.0]).unwrap().into();
    assert!(line.area().is_err());
}

#[test]
fn test_polygon_relate_box() {
    let f = GeometryFactory::geodetic();
    let hole = square(&f, 4.0, 6.0);
    let poly: Shape = f
        .polygon(&[0.0, 10.0, 10.0, 0.0, 0.0], &[0.0, 0.0, 10.0, 10.0, 0.0], vec![hole])
        .unwrap()
        .into();

    assert_eq!(poly.relate_box(&Rectangle::new(1.0, 2.0, 1.0, 2.0)), Relation::Contains);
    assert_eq!(poly.relate_box(&Rectangle::new(-5.0, 15.0, -5.0, 15.0)), Relation::Within);
    assert_eq!(poly.relate_box(&Rectangle::new(20.0, 30.0, 20.0, 30.0)), Relation::Disjoint);
    // inside the hole
    assert_eq!(poly.relate_box(&Rectangle::new(4.5, 5.5, 4.5, 5.5)), Relation::Disjoint);
    // straddles the hole boundary
    assert_eq!(poly.relate_box(&Rectangle::new(3.0, 5.0, 3.0, 5.0)), Relation::Crosses);
    assert_eq!(poly.relate_box(&Rectangle::new(8.0, 12.0, 1.0, 2.0)), Relation::Crosses);
}

#[test]
fn test_line_relate_box() {
    let f = GeometryFactory::geodetic();
    let line: Shape = f.line(&[0.0, 10.0], &[0.0, 10.0]).unwrap().into();
    assert_eq!(line.relate_box(&Rectangle::new(-1.0, 11.0, -1.0, 11.0)), Relation::Within);
    assert_eq!(line.relate_box(&Rectangle::new(4.0, 6.0, 4.0, 6.0)), Relation::Crosses);
    assert_eq!(line.relate_box(&Rectangle::new(6.0, 9.0, 0.0, 3.0)), Relation::Disjoint);
}

#[test]
fn test_antimeridian_query_box() {
    let f = GeometryFactory::geodetic();
    let query = f.rectangle(170.0, -170.0, -10.0, 10.0).unwrap();
    assert!(query.crosses_dateline());
    assert_eq!(query.width(), 20.0);

    let east: Shape = f
        .polygon(&[172.0, 175.0, 175.0, 172.0, 172.0], &[0.0, 0.0, 3.0, 3.0, 0.0], vec![])
        .unwrap()
        .into();
    let west: Shape = f
        .polygon(&[-175.0, -172.0, -172.0, -175.0, -175.0], &[0.0, 0.0, 3.0, 3.0, 0.0], vec![])
        .unwrap()
        .into();
    let far: Shape = square(&f, 0.0, 5.0).into();
    assert_eq!(east.relate_box(&query), Relation::Within);
    assert_eq!(west.relate_box(&query), Relation::Within);
    assert_eq!(far.relate_box(&query), Relation::Disjoint);

    let multi: Shape = f
        .multi_point(&[175.0, -175.0], &[0.0, 0.0])
        .unwrap()
        .into();
    // one point in each half
    assert!(multi.relate_box(&query).intersects());
}

#[test]
fn test_rectangles_both_crossing_antimeridian() {
    let inner = Shape::Rectangle(Rectangle::new(170.0, -170.0, -5.0, 5.0));
    let outer = Shape::Rectangle(Rectangle::new(160.0, -160.0, -10.0, 10.0));
    let ab = inner.relate(&outer).unwrap();
    let ba = outer.relate(&inner).unwrap();
    assert_eq!(ab, Relation::Within);
    assert_eq!(ab, ba.transpose());

    assert!(SpatialOperation::Within.evaluate(&inner, &outer).unwrap());
    assert!(SpatialOperation::Contains.evaluate(&outer, &inner).unwrap());
    assert!(!SpatialOperation::Contains.evaluate(&inner, &outer).unwrap());
}

#[test]
fn test_non_finite_query_box_is_disjoint() {
    let f = GeometryFactory::geodetic();
    let poly: Shape = square(&f, 0.0, 10.0).into();
    let bad = Rectangle::new(f64::NAN, 5.0, 0.0, 5.0);
    assert_eq!(poly.relate_box(&bad), Relation::Disjoint);
}

#[test]
fn test_circle_boundary_is_inclusive() {
    let planar = GeometryFactory::new(CoordinateSystemConfig::planar(-100.0, 100.0, -100.0, 100.0))
        .unwrap();
    let r = distance_between(0.0, 0.0, 10.0, 0.0, DistanceMetric::Euclidean);
    let circle: Shape = planar.circle(0.0, 0.0, r).unwrap().into();
    assert!(circle.contains_point(10.0, 0.0));
    assert!(!circle.contains_point(10.0001, 0.0));

    let geo = GeometryFactory::geodetic();
    let r = distance_between(0.0, 0.0, 10.0, 0.0, DistanceMetric::Haversine);
    let circle: Shape = geo.circle(0.0, 0.0, r).unwrap().into();
    assert!(circle.contains_point(10.0, 0.0));
    assert!(!circle.contains_point(10.0001, 0.0));
    assert_eq!(circle.relate_box(&Rectangle::new(-1.0, 1.0, -1.0, 1.0)), Relation::Contains);
    assert_eq!(circle.relate_box(&Rectangle::new(20.0, 30.0, 20.0, 30.0)), Relation::Disjoint);
}

#[test]
fn test_collection_relations() {
    let f = GeometryFactory::geodetic();
    let col: Shape = f
        .collection(vec![square(&f, 0.0, 1.0).into(), square(&f, 5.0, 6.0).into()])
        .unwrap()
        .into();
    assert_eq!(col.area().unwrap(), 2.0);
    assert_eq!(col.relate_box(&Rectangle::new(-1.0, 7.0, -1.0, 7.0)), Relation::Within);
    assert_eq!(col.relate_box(&Rectangle::new(2.0, 3.0, 2.0, 3.0)), Relation::Disjoint);
    assert!(col.contains_point(5.5, 5.5));
}

#[test]
fn test_unsupported_pairs() {
    let f = GeometryFactory::geodetic();
    let a: Shape = square(&f, 0.0, 1.0).into();
    let b: Shape = f.point(0.5, 0.5).unwrap().into();
    assert!(a.relate(&b).is_err());
    assert!(b.point_inside_encoded(0, 0).is_err());
}

#[test]
fn test_self_intersecting_polygon_is_accepted() {
    // a bowtie: construction succeeds, but relations and area are not
    // meaningful; the two lobes' signed areas cancel
    let f = GeometryFactory::geodetic();
    let bowtie: Shape = f
        .polygon(&[0.0, 2.0, 2.0, 0.0, 0.0], &[0.0, 2.0, 0.0, 2.0, 0.0], vec![])
        .unwrap()
        .into();
    assert_eq!(bowtie.area().unwrap(), 0.0);
    assert_eq!(bowtie.relate_box(&Rectangle::new(-1.0, 3.0, -1.0, 3.0)), Relation::Within);
}

#[test]
fn test_collection_area_ignores_overlap() {
    let f = GeometryFactory::geodetic();
    let col: Shape = f
        .collection(vec![square(&f, 0.0, 2.0).into(), square(&f, 1.0, 3.0).into()])
        .unwrap()
        .into();
    assert_eq!(col.area().unwrap(), 8.0);
}
