use geoshape_types::Relation;

use super::lazy::LazySlot;
use super::{MultiPoint, Rectangle};
use crate::compute::spatial::{EdgeTree, RingRef};

/// A connected path of two or more points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    points: MultiPoint,
    tree: LazySlot<EdgeTree>,
}

impl Line {
    pub(crate) fn from_points(points: MultiPoint) -> Self {
        Self {
            points,
            tree: LazySlot::new(),
        }
    }

    pub fn points(&self) -> &MultiPoint {
        &self.points
    }

    pub fn xs(&self) -> &[f64] {
        self.points.xs()
    }

    pub fn ys(&self) -> &[f64] {
        self.points.ys()
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.points.bounding_box()
    }

    pub(crate) fn ring(&self) -> RingRef<'_> {
        RingRef::new(self.xs(), self.ys())
    }

    /// The edge tree over this line's segments, built on first use.
    pub fn edge_tree(&self) -> &EdgeTree {
        self.tree.get_or_init(|| EdgeTree::from_lines([self.ring()]))
    }

    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        relate_path_tree(self.edge_tree(), rect)
    }
}

/// Two or more independent lines.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLine {
    lines: Vec<Line>,
    bbox: Rectangle,
    tree: LazySlot<EdgeTree>,
}

impl MultiLine {
    pub(crate) fn from_lines(lines: Vec<Line>) -> Self {
        let bbox = union_bounds(lines.iter().map(Line::bounding_box));
        Self {
            lines,
            bbox,
            tree: LazySlot::new(),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.bbox
    }

    pub fn edge_tree(&self) -> &EdgeTree {
        self.tree
            .get_or_init(|| EdgeTree::from_lines(self.lines.iter().map(Line::ring)))
    }

    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        relate_path_tree(self.edge_tree(), rect)
    }
}

/// Shape-side relation of paths to a box: `Within` when the box holds
/// every path, `Crosses` when any segment touches the box.
fn relate_path_tree(tree: &EdgeTree, rect: &Rectangle) -> Relation {
    tree.relate(rect.left(), rect.right(), rect.bottom(), rect.top())
        .transpose()
}

/// Union of non-crossing bounding boxes.
pub(crate) fn union_bounds<I>(boxes: I) -> Rectangle
where
    I: IntoIterator<Item = Rectangle>,
{
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for b in boxes {
        min_x = min_x.min(b.left());
        max_x = max_x.max(b.right());
        min_y = min_y.min(b.bottom());
        max_y = max_y.max(b.top());
    }
    Rectangle::new(min_x, max_x, min_y, max_y)
}
