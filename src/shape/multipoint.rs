use geoshape_types::Relation;

use super::{Point, Rectangle};

/// Parallel x/y coordinate arrays. Also the coordinate storage behind
/// lines and polygon rings.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPoint {
    xs: Vec<f64>,
    ys: Vec<f64>,
    bbox: Rectangle,
}

impl MultiPoint {
    /// Callers guarantee equal, non-zero lengths.
    pub(crate) fn from_parts(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        let bbox = bounds_of(&xs, &ys);
        Self { xs, ys, bbox }
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        Some(Point::new(*self.xs.get(index)?, *self.ys.get(index)?))
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.xs.iter().zip(&self.ys).map(|(x, y)| Point::new(*x, *y))
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.bbox
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.points().any(|p| p.x() == x && p.y() == y)
    }

    /// `Disjoint` if no point is in the box, `Within` if all are,
    /// `Crosses` otherwise.
    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        let inside = self
            .points()
            .filter(|p| rect.contains_point(p.x(), p.y()))
            .count();
        if inside == 0 {
            Relation::Disjoint
        } else if inside == self.len() {
            Relation::Within
        } else {
            Relation::Crosses
        }
    }
}

pub(crate) fn bounds_of(xs: &[f64], ys: &[f64]) -> Rectangle {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in xs.iter().zip(ys) {
        min_x = min_x.min(*x);
        max_x = max_x.max(*x);
        min_y = min_y.min(*y);
        max_y = max_y.max(*y);
    }
    Rectangle::new(min_x, max_x, min_y, max_y)
}
