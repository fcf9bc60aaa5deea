use geoshape_types::Relation;

use super::Rectangle;

/// A single coordinate. Zero area; its bounding box is degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(self.x, self.x, self.y, self.y)
    }

    /// `Within` if the point lies in the box (bounds inclusive), else
    /// `Disjoint`.
    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        if rect.contains_point(self.x, self.y) {
            Relation::Within
        } else {
            Relation::Disjoint
        }
    }
}

impl From<geo::Point> for Point {
    fn from(p: geo::Point) -> Self {
        Point::new(p.x(), p.y())
    }
}

impl From<Point> for geo::Point {
    fn from(p: Point) -> Self {
        geo::Point::new(p.x, p.y)
    }
}
