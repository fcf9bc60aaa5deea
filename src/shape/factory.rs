//! Validated shape construction.

use geoshape_types::crs::CoordinateSystemConfig;

use super::{
    Circle, Line, MultiLine, MultiPoint, MultiPolygon, Point, Polygon, Rectangle, Shape,
    ShapeCollection,
};
use crate::compute::spatial::DistanceMetric;
use crate::compute::validation::{
    validate_closed_ring, validate_coordinate, validate_coordinates, validate_polygon,
    validate_radius,
};
use crate::encoding::CoordinateEncoder;
use crate::error::{GeoShapeError, Result};

/// Builds shapes for one coordinate reference system.
///
/// Every constructor validates its input completely and either returns a
/// finished shape or an error; nothing is repaired.
///
/// # Examples
///
/// ```
/// use geoshape::shape::GeometryFactory;
///
/// let factory = GeometryFactory::geodetic();
/// let square = factory
///     .polygon(&[0.0, 1.0, 1.0, 0.0, 0.0], &[0.0, 0.0, 1.0, 1.0, 0.0], vec![])
///     .unwrap();
/// assert_eq!(square.area(), 1.0);
///
/// // not closed
/// assert!(factory.polygon(&[0.0, 1.0, 1.0, 0.0], &[0.0, 0.0, 1.0, 1.0], vec![]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryFactory {
    crs: CoordinateSystemConfig,
    encoder: CoordinateEncoder,
    metric: DistanceMetric,
}

impl GeometryFactory {
    /// A factory for `crs`. Circles use the haversine metric when the
    /// system wraps longitude and the euclidean metric otherwise.
    pub fn new(crs: CoordinateSystemConfig) -> Result<Self> {
        crs.validate().map_err(GeoShapeError::InvalidConfig)?;
        let metric = if crs.wraps_longitude {
            DistanceMetric::Haversine
        } else {
            DistanceMetric::Euclidean
        };
        Ok(Self {
            crs,
            encoder: CoordinateEncoder::new(&crs),
            metric,
        })
    }

    pub fn geodetic() -> Self {
        let crs = CoordinateSystemConfig::geodetic();
        Self {
            crs,
            encoder: CoordinateEncoder::new(&crs),
            metric: DistanceMetric::Haversine,
        }
    }

    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn crs(&self) -> &CoordinateSystemConfig {
        &self.crs
    }

    pub fn encoder(&self) -> &CoordinateEncoder {
        &self.encoder
    }

    pub fn distance_metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn point(&self, x: f64, y: f64) -> Result<Point> {
        validate_coordinate(&self.crs, x, y)?;
        Ok(Point::new(x, y))
    }

    pub fn multi_point(&self, xs: &[f64], ys: &[f64]) -> Result<MultiPoint> {
        validate_coordinates(&self.crs, xs, ys, 1)?;
        Ok(MultiPoint::from_parts(xs.to_vec(), ys.to_vec()))
    }

    pub fn line(&self, xs: &[f64], ys: &[f64]) -> Result<Line> {
        validate_coordinates(&self.crs, xs, ys, 2)?;
        Ok(Line::from_points(MultiPoint::from_parts(
            xs.to_vec(),
            ys.to_vec(),
        )))
    }

    pub fn multi_line(&self, lines: Vec<Line>) -> Result<MultiLine> {
        if lines.is_empty() {
            return Err(GeoShapeError::InvalidGeometry(
                "a multi-line needs at least one line".to_string(),
            ));
        }
        Ok(MultiLine::from_lines(lines))
    }

    /// A polygon from a closed shell ring and holes. Holes may not have
    /// holes of their own.
    pub fn polygon(&self, xs: &[f64], ys: &[f64], holes: Vec<Polygon>) -> Result<Polygon> {
        validate_coordinates(&self.crs, xs, ys, 4)?;
        validate_closed_ring(xs, ys)?;
        if let Some(idx) = holes.iter().position(|h| !h.holes().is_empty()) {
            return Err(GeoShapeError::InvalidGeometry(format!(
                "hole {} has holes of its own",
                idx
            )));
        }
        Ok(Polygon::from_parts(
            MultiPoint::from_parts(xs.to_vec(), ys.to_vec()),
            holes,
            self.encoder,
        ))
    }

    pub fn multi_polygon(&self, polygons: Vec<Polygon>) -> Result<MultiPolygon> {
        if polygons.is_empty() {
            return Err(GeoShapeError::InvalidGeometry(
                "a multi-polygon needs at least one polygon".to_string(),
            ));
        }
        Ok(MultiPolygon::from_parts(polygons, self.encoder))
    }

    /// A rectangle. `min_x > max_x` is accepted only in a system that wraps
    /// longitude, where it crosses the antimeridian.
    pub fn rectangle(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Rectangle> {
        validate_coordinate(&self.crs, min_x, min_y)?;
        validate_coordinate(&self.crs, max_x, max_y)?;
        if min_y > max_y {
            return Err(GeoShapeError::InvalidGeometry(format!(
                "min y {} is above max y {}",
                min_y, max_y
            )));
        }
        if min_x > max_x && !self.crs.wraps_longitude {
            return Err(GeoShapeError::InvalidGeometry(format!(
                "min x {} is right of max x {}",
                min_x, max_x
            )));
        }
        Ok(Rectangle::new(min_x, max_x, min_y, max_y))
    }

    pub fn circle(&self, x: f64, y: f64, radius: f64) -> Result<Circle> {
        validate_coordinate(&self.crs, x, y)?;
        validate_radius(radius)?;
        Ok(Circle::from_parts(
            Point::new(x, y),
            radius,
            self.metric,
            self.encoder,
        ))
    }

    pub fn collection(&self, shapes: Vec<Shape>) -> Result<ShapeCollection> {
        if shapes.is_empty() {
            return Err(GeoShapeError::InvalidGeometry(
                "a shape collection needs at least one shape".to_string(),
            ));
        }
        Ok(ShapeCollection::from_shapes(shapes))
    }

    pub fn from_geo_point(&self, point: &geo::Point) -> Result<Point> {
        self.point(point.x(), point.y())
    }

    pub fn from_geo_rect(&self, rect: &geo::Rect) -> Result<Rectangle> {
        let (min, max) = (rect.min(), rect.max());
        self.rectangle(min.x, max.x, min.y, max.y)
    }

    pub fn from_geo_line_string(&self, line: &geo::LineString) -> Result<Line> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = line.coords().map(|c| (c.x, c.y)).unzip();
        self.line(&xs, &ys)
    }

    /// Converts a `geo` polygon, its interiors becoming holes.
    pub fn from_geo_polygon(&self, polygon: &geo::Polygon) -> Result<Polygon> {
        validate_polygon(&self.crs, polygon)?;
        let holes = polygon
            .interiors()
            .iter()
            .map(|ring| {
                let (xs, ys): (Vec<f64>, Vec<f64>) = ring.coords().map(|c| (c.x, c.y)).unzip();
                self.polygon(&xs, &ys, vec![])
            })
            .collect::<Result<Vec<_>>>()?;
        let (xs, ys): (Vec<f64>, Vec<f64>) =
            polygon.exterior().coords().map(|c| (c.x, c.y)).unzip();
        self.polygon(&xs, &ys, holes)
    }
}

impl Default for GeometryFactory {
    fn default() -> Self {
        Self::geodetic()
    }
}
