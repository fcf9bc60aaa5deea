//! The shape model.
//!
//! [`Shape`] is a closed set of geometry kinds. Every shape knows its
//! bounding box and center from construction; edge trees, predicate grids
//! and areas are derived lazily (see [`LazySlot`]).
//!
//! Relations are read from the receiver's side: `shape.relate_box(r) ==
//! Contains` means the shape contains `r`.

mod circle;
mod collection;
pub mod factory;
mod lazy;
mod line;
mod multipoint;
mod point;
mod polygon;
mod rectangle;

pub use circle::Circle;
pub use collection::ShapeCollection;
pub use factory::GeometryFactory;
pub use lazy::LazySlot;
pub use line::{Line, MultiLine};
pub use multipoint::MultiPoint;
pub use point::Point;
pub use polygon::{MultiPolygon, Polygon};
pub use rectangle::Rectangle;

use std::fmt;

use geoshape_types::Relation;

use crate::error::{GeoShapeError, Result};
use rectangle::combine_box_halves;

/// Kinds of shapes, with their names and ordinals in the text and binary
/// encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Envelope,
    Circle,
}

impl ShapeType {
    pub const fn wkt_name(self) -> &'static str {
        match self {
            ShapeType::Point => "POINT",
            ShapeType::LineString => "LINESTRING",
            ShapeType::Polygon => "POLYGON",
            ShapeType::MultiPoint => "MULTIPOINT",
            ShapeType::MultiLineString => "MULTILINESTRING",
            ShapeType::MultiPolygon => "MULTIPOLYGON",
            ShapeType::GeometryCollection => "GEOMETRYCOLLECTION",
            ShapeType::Envelope => "ENVELOPE",
            ShapeType::Circle => "CIRCLE",
        }
    }

    pub const fn wkb_ordinal(self) -> u32 {
        match self {
            ShapeType::Point => 1,
            ShapeType::LineString => 2,
            ShapeType::Polygon => 3,
            ShapeType::MultiPoint => 4,
            ShapeType::MultiLineString => 5,
            ShapeType::MultiPolygon => 6,
            ShapeType::GeometryCollection => 7,
            ShapeType::Envelope => 8,
            ShapeType::Circle => 9,
        }
    }

    pub const fn from_wkb_ordinal(ordinal: u32) -> Option<ShapeType> {
        Some(match ordinal {
            1 => ShapeType::Point,
            2 => ShapeType::LineString,
            3 => ShapeType::Polygon,
            4 => ShapeType::MultiPoint,
            5 => ShapeType::MultiLineString,
            6 => ShapeType::MultiPolygon,
            7 => ShapeType::GeometryCollection,
            8 => ShapeType::Envelope,
            9 => ShapeType::Circle,
            _ => return None,
        })
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wkt_name())
    }
}

/// Any supported geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    MultiPoint(MultiPoint),
    Line(Line),
    MultiLine(MultiLine),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    Rectangle(Rectangle),
    Circle(Circle),
    Collection(ShapeCollection),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Point(_) => ShapeType::Point,
            Shape::MultiPoint(_) => ShapeType::MultiPoint,
            Shape::Line(_) => ShapeType::LineString,
            Shape::MultiLine(_) => ShapeType::MultiLineString,
            Shape::Polygon(_) => ShapeType::Polygon,
            Shape::MultiPolygon(_) => ShapeType::MultiPolygon,
            Shape::Rectangle(_) => ShapeType::Envelope,
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Collection(_) => ShapeType::GeometryCollection,
        }
    }

    pub fn bounding_box(&self) -> Rectangle {
        match self {
            Shape::Point(p) => p.bounding_box(),
            Shape::MultiPoint(mp) => mp.bounding_box(),
            Shape::Line(l) => l.bounding_box(),
            Shape::MultiLine(ml) => ml.bounding_box(),
            Shape::Polygon(p) => p.bounding_box(),
            Shape::MultiPolygon(mp) => mp.bounding_box(),
            Shape::Rectangle(r) => *r,
            Shape::Circle(c) => c.bounding_box(),
            Shape::Collection(c) => c.bounding_box(),
        }
    }

    pub fn center(&self) -> Point {
        match self {
            Shape::Point(p) => *p,
            Shape::Circle(c) => c.center(),
            other => other.bounding_box().center(),
        }
    }

    pub fn has_area(&self) -> bool {
        match self {
            Shape::Point(_) | Shape::MultiPoint(_) | Shape::Line(_) | Shape::MultiLine(_) => false,
            Shape::Polygon(_) | Shape::MultiPolygon(_) => true,
            Shape::Rectangle(r) => r.has_area(),
            Shape::Circle(c) => c.has_area(),
            Shape::Collection(c) => c.has_area(),
        }
    }

    /// Area in squared coordinate units (squared meters for geodetic
    /// circles). Fails for shapes without area.
    pub fn area(&self) -> Result<f64> {
        if !self.has_area() {
            return Err(GeoShapeError::UnsupportedOperation(format!(
                "{} has no area",
                self.shape_type()
            )));
        }
        Ok(match self {
            Shape::Polygon(p) => p.area(),
            Shape::MultiPolygon(mp) => mp.area(),
            Shape::Rectangle(r) => r.area(),
            Shape::Circle(c) => c.area(),
            Shape::Collection(c) => c.area()?,
            _ => 0.0,
        })
    }

    /// How this shape relates to a query box. Except for rectangles, boxes
    /// crossing the antimeridian are split and the halves' relations
    /// combined.
    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        if !rect.is_finite() {
            log::warn!("Rejecting relate with non-finite query box {:?}", rect);
            return Relation::Disjoint;
        }
        if rect.crosses_dateline() && !matches!(self, Shape::Rectangle(_)) {
            let (east, west) = rect.split_dateline();
            return combine_box_halves(self.relate_box(&east), self.relate_box(&west));
        }
        match self {
            Shape::Point(p) => p.relate_box(rect),
            Shape::MultiPoint(mp) => mp.relate_box(rect),
            Shape::Line(l) => l.relate_box(rect),
            Shape::MultiLine(ml) => ml.relate_box(rect),
            Shape::Polygon(p) => p.relate_box(rect),
            Shape::MultiPolygon(mp) => mp.relate_box(rect),
            Shape::Rectangle(r) => r.relate_rect(rect),
            Shape::Circle(c) => c.relate_box(rect),
            Shape::Collection(c) => c.relate_box(rect),
        }
    }

    /// How this shape relates to another.
    ///
    /// Defined whenever either side is a rectangle: a rectangle relates to
    /// any shape by asking that shape to relate to the rectangle and
    /// transposing the answer. Other pairs fail with
    /// [`GeoShapeError::UnsupportedOperation`].
    pub fn relate(&self, other: &Shape) -> Result<Relation> {
        match (self, other) {
            (Shape::Rectangle(r), _) => Ok(other.relate_box(r).transpose()),
            (_, Shape::Rectangle(r)) => Ok(self.relate_box(r)),
            _ => Err(GeoShapeError::UnsupportedOperation(format!(
                "relating {} to {} is not supported",
                self.shape_type(),
                other.shape_type()
            ))),
        }
    }

    /// Exact point test. Points and multi-points match by equality; lines
    /// contain nothing.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        match self {
            Shape::Point(p) => p.x() == x && p.y() == y,
            Shape::MultiPoint(mp) => mp.contains_point(x, y),
            Shape::Line(_) | Shape::MultiLine(_) => false,
            Shape::Polygon(p) => p.contains_point(x, y),
            Shape::MultiPolygon(mp) => mp.contains_point(x, y),
            Shape::Rectangle(r) => r.contains_point(x, y),
            Shape::Circle(c) => c.contains_point(x, y),
            Shape::Collection(c) => c.contains_point(x, y),
        }
    }

    /// Point test on encoded coordinates through the shape's predicate
    /// grid. Available for polygons, multi-polygons and circles.
    pub fn point_inside_encoded(&self, encoded_x: i32, encoded_y: i32) -> Result<bool> {
        match self {
            Shape::Polygon(p) => p.point_inside_encoded(encoded_x, encoded_y),
            Shape::MultiPolygon(mp) => mp.point_inside_encoded(encoded_x, encoded_y),
            Shape::Circle(c) => c.point_inside_encoded(encoded_x, encoded_y),
            other => Err(GeoShapeError::UnsupportedOperation(format!(
                "{} has no predicate grid",
                other.shape_type()
            ))),
        }
    }
}

impl From<Point> for Shape {
    fn from(p: Point) -> Self {
        Shape::Point(p)
    }
}

impl From<MultiPoint> for Shape {
    fn from(mp: MultiPoint) -> Self {
        Shape::MultiPoint(mp)
    }
}

impl From<Line> for Shape {
    fn from(l: Line) -> Self {
        Shape::Line(l)
    }
}

impl From<MultiLine> for Shape {
    fn from(ml: MultiLine) -> Self {
        Shape::MultiLine(ml)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Shape::Polygon(p)
    }
}

impl From<MultiPolygon> for Shape {
    fn from(mp: MultiPolygon) -> Self {
        Shape::MultiPolygon(mp)
    }
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Shape::Rectangle(r)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<ShapeCollection> for Shape {
    fn from(c: ShapeCollection) -> Self {
        Shape::Collection(c)
    }
}
