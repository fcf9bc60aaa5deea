//! Lazy child-cell iteration.

use geoshape_types::Relation;

use super::Cell;
use crate::shape::{Rectangle, Shape};

/// The children of one cell, produced on demand. One-shot: iterate the
/// parent again to restart.
#[derive(Debug, Clone)]
pub struct ChildCells {
    parent: Cell,
    max_levels: usize,
    next: usize,
}

impl ChildCells {
    pub fn new(parent: Cell, max_levels: usize) -> Self {
        Self {
            parent,
            max_levels,
            next: 0,
        }
    }
}

impl Iterator for ChildCells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        while self.next < self.parent.child_count() {
            let index = self.next;
            self.next += 1;
            if let Some(child) = self.parent.child(index, self.max_levels) {
                return Some(child);
            }
        }
        None
    }
}

/// Skips cells a filter shape does not reach.
///
/// Surviving cells carry the filter's relation to them; cells the filter
/// contains are marked as leaves. A cell that only shares an edge or a
/// corner with a shape that has area is treated as disjoint.
#[derive(Debug, Clone)]
pub struct FilterCellIterator<'a, I> {
    inner: I,
    filter: Option<&'a Shape>,
}

pub type CellIterator<'a> = FilterCellIterator<'a, ChildCells>;

impl<'a, I> FilterCellIterator<'a, I> {
    pub fn new(inner: I, filter: Option<&'a Shape>) -> Self {
        Self { inner, filter }
    }
}

impl<I> Iterator for FilterCellIterator<'_, I>
where
    I: Iterator<Item = Cell>,
{
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let Some(filter) = self.filter else {
            return self.inner.next();
        };
        for mut cell in self.inner.by_ref() {
            let rel = filter.relate_box(cell.rectangle());
            if !rel.intersects() || touches_only(filter, cell.rectangle()) {
                continue;
            }
            cell.set_shape_rel(rel);
            if rel == Relation::Contains {
                cell.set_leaf();
            }
            return Some(cell);
        }
        None
    }
}

/// Whether an areal shape can meet `rect` only along a line or at a point.
fn touches_only(shape: &Shape, rect: &Rectangle) -> bool {
    if !shape.has_area() {
        return false;
    }
    let bbox = shape.bounding_box();
    if bbox.crosses_dateline() || rect.crosses_dateline() {
        return false;
    }
    let width = bbox.right().min(rect.right()) - bbox.left().max(rect.left());
    let height = bbox.top().min(rect.top()) - bbox.bottom().max(rect.bottom());
    width <= 0.0 || height <= 0.0
}
