//! Circles: a center and a radius under a distance metric.
//!
//! With the haversine metric the radius is in meters on a spherical earth
//! and the bounding box may cross the antimeridian or reach a pole. With
//! the euclidean metric the radius is in coordinate units.

use geoshape_types::Relation;

use super::lazy::LazySlot;
use super::{Point, Rectangle};
use crate::compute::spatial::GridPredicate;
use crate::compute::spatial::algorithms::{
    AXIS_LAT_ERROR, DistanceMetric, axis_lat, bounding_box_for_point_distance, distance_between,
    within_90_lon_degrees,
};
use crate::encoding::CoordinateEncoder;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
    metric: DistanceMetric,
    encoder: CoordinateEncoder,
    bbox: Rectangle,
    axis_lat: f64,
    grid: LazySlot<GridPredicate>,
}

impl Circle {
    pub(crate) fn from_parts(
        center: Point,
        radius: f64,
        metric: DistanceMetric,
        encoder: CoordinateEncoder,
    ) -> Self {
        let (bbox, axis) = match metric {
            DistanceMetric::Haversine => {
                let (min_x, max_x, min_y, max_y) =
                    bounding_box_for_point_distance(center.x(), center.y(), radius);
                (
                    Rectangle::new(min_x, max_x, min_y, max_y),
                    axis_lat(center.y(), radius),
                )
            }
            DistanceMetric::Euclidean => (
                Rectangle::new(
                    (center.x() - radius).max(encoder.x.min()),
                    (center.x() + radius).min(encoder.x.max()),
                    (center.y() - radius).max(encoder.y.min()),
                    (center.y() + radius).min(encoder.y.max()),
                ),
                center.y(),
            ),
        };
        Self {
            center,
            radius,
            metric,
            encoder,
            bbox,
            axis_lat: axis,
            grid: LazySlot::new(),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.bbox
    }

    pub fn has_area(&self) -> bool {
        self.radius > 0.0
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    fn distance_to(&self, x: f64, y: f64) -> f64 {
        distance_between(self.center.x(), self.center.y(), x, y, self.metric)
    }

    /// Boundary inclusive.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.distance_to(x, y) <= self.radius
    }

    /// Shape-side relation to a box that does not cross the antimeridian.
    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        match self.bbox.relate_rect(rect) {
            Relation::Disjoint => return Relation::Disjoint,
            Relation::Within => return Relation::Within,
            _ => {}
        }
        let box_side = match self.metric {
            DistanceMetric::Haversine => self.relate_spherical(rect),
            DistanceMetric::Euclidean => self.relate_planar(rect),
        };
        box_side.transpose()
    }

    fn corners_within(&self, rect: &Rectangle) -> bool {
        [
            (rect.left(), rect.bottom()),
            (rect.right(), rect.bottom()),
            (rect.left(), rect.top()),
            (rect.right(), rect.top()),
        ]
        .iter()
        .all(|(x, y)| self.contains_point(*x, *y))
    }

    /// Box-side relation on the sphere: `Within` when the box is inside
    /// the circle.
    fn relate_spherical(&self, rect: &Rectangle) -> Relation {
        let (lon, lat) = (self.center.x(), self.center.y());
        if (lon < rect.left() || lon > rect.right())
            && (self.axis_lat + AXIS_LAT_ERROR < rect.bottom()
                || self.axis_lat - AXIS_LAT_ERROR > rect.top())
        {
            // the closest point of the box is one of its corners
            let all_far = [
                (rect.left(), rect.bottom()),
                (rect.right(), rect.bottom()),
                (rect.left(), rect.top()),
                (rect.right(), rect.top()),
            ]
            .iter()
            .all(|(x, y)| self.distance_to(*x, *y) > self.radius);
            if all_far {
                return Relation::Disjoint;
            }
        }
        if within_90_lon_degrees(lon, rect.left(), rect.right()) && self.corners_within(rect) {
            return Relation::Within;
        }
        Relation::Crosses
    }

    fn relate_planar(&self, rect: &Rectangle) -> Relation {
        if self.corners_within(rect) {
            return Relation::Within;
        }
        let nx = self.center.x().clamp(rect.left(), rect.right());
        let ny = self.center.y().clamp(rect.bottom(), rect.top());
        if self.distance_to(nx, ny) > self.radius {
            Relation::Disjoint
        } else {
            Relation::Crosses
        }
    }

    pub fn grid(&self) -> Result<&GridPredicate> {
        self.grid.get_or_try_init(|| {
            GridPredicate::build(&self.bbox, &self.encoder, |cell| {
                self.relate_box(cell).transpose()
            })
        })
    }

    pub fn point_inside_encoded(&self, encoded_x: i32, encoded_y: i32) -> Result<bool> {
        let grid = self.grid()?;
        Ok(grid.test(encoded_y, encoded_x, || {
            self.contains_point(
                self.encoder.decode_x(encoded_x),
                self.encoder.decode_y(encoded_y),
            )
        }))
    }
}
