use geoshape_types::Relation;
use geoshape_types::crs::{MAX_LON_INCL, MIN_LON_INCL};

use super::lazy::LazySlot;
use super::line::union_bounds;
use super::{Rectangle, Shape};
use crate::error::Result;

/// A heterogeneous group of shapes.
///
/// The area is the sum of the members' areas; overlapping members are
/// counted twice.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCollection {
    shapes: Vec<Shape>,
    bbox: Rectangle,
    area: LazySlot<f64>,
}

impl ShapeCollection {
    pub(crate) fn from_shapes(shapes: Vec<Shape>) -> Self {
        let bbox = union_bounds(shapes.iter().map(|s| {
            let b = s.bounding_box();
            if b.crosses_dateline() {
                Rectangle::new(MIN_LON_INCL, MAX_LON_INCL, b.bottom(), b.top())
            } else {
                b
            }
        }));
        Self {
            shapes,
            bbox,
            area: LazySlot::new(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.bbox
    }

    pub fn has_area(&self) -> bool {
        self.shapes.iter().any(Shape::has_area)
    }

    pub fn area(&self) -> Result<f64> {
        self.area
            .get_or_try_init(|| {
                self.shapes
                    .iter()
                    .filter(|s| s.has_area())
                    .map(Shape::area)
                    .sum()
            })
            .copied()
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.shapes.iter().any(|s| s.contains_point(x, y))
    }

    /// Any member containing the box contains it; otherwise the members
    /// must agree on `Within` or `Disjoint`, and disagreement crosses.
    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        let mut within = 0;
        let mut disjoint = 0;
        for shape in &self.shapes {
            match shape.relate_box(rect) {
                Relation::Contains => return Relation::Contains,
                Relation::Within => within += 1,
                Relation::Disjoint => disjoint += 1,
                _ => {}
            }
        }
        if within == self.shapes.len() {
            Relation::Within
        } else if disjoint == self.shapes.len() {
            Relation::Disjoint
        } else {
            Relation::Crosses
        }
    }
}
