use geoshape::codec::{legacy, wkb, wkt};
use geoshape::{
    CoordinateSystemConfig, GeoShapeError, GeometryFactory, Shape, SpatialArgs,
    SpatialOperation,
};

fn factory() -> GeometryFactory {
    GeometryFactory::geodetic()
}

fn sample_shapes(f: &GeometryFactory) -> Vec<Shape> {
    let hole = f
        .polygon(&[1.0, 2.0, 2.0, 1.0, 1.0], &[1.0, 1.0, 2.0, 2.0, 1.0], vec![])
        .unwrap();
    let poly = f
        .polygon(&[0.0, 5.0, 5.0, 0.0, 0.0], &[0.0, 0.0, 5.0, 5.0, 0.0], vec![hole])
        .unwrap();
    let other = f
        .polygon(&[10.0, 11.0, 11.0, 10.0], &[10.0, 10.0, 11.0, 10.0], vec![])
        .unwrap();
    let l1 = f.line(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
    let l2 = f.line(&[-5.0, -6.0], &[3.0, 4.0]).unwrap();
    vec![
        f.point(-73.99, 40.73).unwrap().into(),
        f.multi_point(&[1.0, 2.0, 3.0], &[-1.0, -2.0, -3.0]).unwrap().into(),
        l1.clone().into(),
        f.multi_line(vec![l1, l2]).unwrap().into(),
        poly.clone().into(),
        f.multi_polygon(vec![poly, other]).unwrap().into(),
        f.rectangle(170.0, -170.0, -5.0, 5.0).unwrap().into(),
        f.circle(12.5, 41.9, 2500.0).unwrap().into(),
    ]
}

#[test]
fn test_wkb_preserves_every_kind() {
    let f = factory();
    for shape in sample_shapes(&f) {
        let bytes = wkb::to_wkb(&shape).unwrap();
        let back = wkb::from_wkb(&bytes, &f).unwrap();
        assert_eq!(back, shape, "{}", shape.shape_type());
        assert_eq!(back.bounding_box(), shape.bounding_box());
    }
}

#[test]
fn test_wkb_stream_of_shapes() {
    let f = factory();
    let shapes = sample_shapes(&f);
    let mut buf = bytes::BytesMut::new();
    for s in &shapes {
        wkb::write_wkb(s, &mut buf).unwrap();
    }
    let mut slice = &buf[..];
    let mut decoded = Vec::new();
    while !slice.is_empty() {
        decoded.push(wkb::read_wkb(&mut slice, &f).unwrap());
    }
    assert_eq!(decoded, shapes);
}

#[test]
fn test_wkb_reader_validates_against_factory() {
    let planar = GeometryFactory::new(CoordinateSystemConfig::planar(0.0, 10.0, 0.0, 10.0))
        .unwrap();
    let geo_point: Shape = factory().point(50.0, 50.0).unwrap().into();
    let bytes = wkb::to_wkb(&geo_point).unwrap();
    assert!(matches!(
        wkb::from_wkb(&bytes, &planar),
        Err(GeoShapeError::InvalidCoordinate(_))
    ));
}

#[test]
fn test_legacy_records() {
    let f = factory();
    for shape in sample_shapes(&f) {
        let supported = matches!(
            shape,
            Shape::Point(_) | Shape::Rectangle(_) | Shape::Circle(_)
        );
        match legacy::to_legacy(&shape) {
            Ok(bytes) => {
                assert!(supported);
                assert_eq!(legacy::from_legacy(&bytes, &f).unwrap(), shape);
            }
            Err(e) => {
                assert!(!supported);
                assert!(matches!(e, GeoShapeError::UnsupportedOperation(_)));
            }
        }
    }
}

#[test]
fn test_wkt_for_everything_but_circles() {
    let f = factory();
    for shape in sample_shapes(&f) {
        let text = wkt::to_wkt(&shape);
        if matches!(shape, Shape::Circle(_)) {
            assert!(text.is_err());
        } else {
            let text = text.unwrap();
            assert!(text.starts_with(shape.shape_type().wkt_name()), "{}", text);
        }
    }
    let rect: Shape = f.rectangle(170.0, -170.0, -5.0, 5.0).unwrap().into();
    assert_eq!(wkt::to_wkt(&rect).unwrap(), "ENVELOPE(170, -170, 5, -5)");
}

#[test]
fn test_operations_on_decoded_shapes() {
    let f = factory();
    let indexed = wkb::from_wkb(
        &wkb::to_wkb(&Shape::from(f.rectangle(10.0, 10.0, 0.0, 0.0).unwrap())).unwrap(),
        &f,
    )
    .unwrap();
    let query: Shape = f.rectangle(20.0, 20.0, 0.0, 0.0).unwrap().into();
    assert!(!SpatialOperation::Within.evaluate(&indexed, &query).unwrap());
    assert!(SpatialOperation::Disjoint.evaluate(&indexed, &query).unwrap());

    let args = SpatialArgs::new(SpatialOperation::for_name("bboxintersects").unwrap(), query);
    assert!(args.validate().is_ok());
    assert!(!args.evaluate(&indexed).unwrap());
}
