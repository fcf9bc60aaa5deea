//! Spatial prefix trees: hierarchical decompositions of the world into
//! cells addressed by tokens whose prefixes name ancestor cells.
//!
//! The tree is never materialized. Cells are created on demand by
//! iterating a parent's children, optionally filtered by a shape so that
//! cells disjoint from it are skipped and cells the shape fully covers
//! come back as leaves.

pub mod geohash;
pub mod iter;
pub mod quad;
pub mod traversal;

pub use geohash::GeohashPrefixTree;
pub use iter::{CellIterator, ChildCells, FilterCellIterator};
pub use quad::{QuadPrefixTree, QuadTermsEnum};
pub use traversal::{
    CellMatch, CoveringCells, approx_within, buffer_shape, classify_within, cover, detail_level,
};

use std::fmt;

use geoshape_types::Relation;

use crate::shape::{Rectangle, Shape};

/// Address of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellToken {
    /// Packed quad path, see [`quad`].
    Quad(u64),
    /// Lower-case geohash.
    Geohash(String),
}

/// One cell of a prefix tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    token: CellToken,
    level: usize,
    rect: Rectangle,
    leaf: bool,
    shape_rel: Option<Relation>,
}

impl Cell {
    pub(crate) fn new(token: CellToken, level: usize, rect: Rectangle, leaf: bool) -> Self {
        let token = match token {
            CellToken::Quad(t) if leaf => CellToken::Quad(quad::with_leaf(t)),
            other => other,
        };
        Self {
            token,
            level,
            rect,
            leaf,
            shape_rel: None,
        }
    }

    pub fn token(&self) -> &CellToken {
        &self.token
    }

    /// Depth of the cell; the world cell is level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn rectangle(&self) -> &Rectangle {
        &self.rect
    }

    /// A leaf needs no further subdivision: it is at the tree's maximum
    /// depth, or a filter shape covers it entirely.
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub fn set_leaf(&mut self) {
        self.leaf = true;
        if let CellToken::Quad(t) = self.token {
            self.token = CellToken::Quad(quad::with_leaf(t));
        }
    }

    /// Relation of the last filter shape to this cell, from the shape's
    /// side: `Contains` means the shape covers the cell.
    pub fn shape_rel(&self) -> Option<Relation> {
        self.shape_rel
    }

    pub fn set_shape_rel(&mut self, rel: Relation) {
        self.shape_rel = Some(rel);
    }

    pub fn child_count(&self) -> usize {
        match self.token {
            CellToken::Quad(_) => quad::CHILD_COUNT,
            CellToken::Geohash(_) => geohash::CHILD_COUNT,
        }
    }

    /// The child at `index`, or `None` past the last child or at
    /// `max_levels`.
    pub fn child(&self, index: usize, max_levels: usize) -> Option<Cell> {
        if self.level >= max_levels {
            return None;
        }
        match &self.token {
            CellToken::Quad(t) => quad::child_cell(self, *t, index, max_levels),
            CellToken::Geohash(hash) => geohash::child_cell(hash, index, max_levels),
        }
    }

    /// Whether this cell is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &Cell) -> bool {
        if self.level > other.level {
            return false;
        }
        match (&self.token, &other.token) {
            (CellToken::Quad(a), CellToken::Quad(b)) => (1..=self.level)
                .all(|l| quad::token_quadrant(*a, l) == quad::token_quadrant(*b, l)),
            (CellToken::Geohash(a), CellToken::Geohash(b)) => b.starts_with(a.as_str()),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    /// Quad paths print as one digit per level, geohashes as themselves.
    /// Leaves end in `+`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            CellToken::Quad(t) => {
                for l in 1..=self.level {
                    write!(f, "{}", quad::token_quadrant(*t, l))?;
                }
            }
            CellToken::Geohash(hash) => f.write_str(hash)?,
        }
        if self.leaf {
            f.write_str("+")?;
        }
        Ok(())
    }
}

/// A hierarchical grid over the world.
pub trait SpatialPrefixTree: fmt::Debug + Send + Sync {
    /// Deepest level; cells at this level are always leaves.
    fn max_levels(&self) -> usize;

    /// The level 0 cell covering the whole world.
    fn world_cell(&self) -> Cell;

    /// `(width, height)` of cells at `level`.
    fn cell_size(&self, level: usize) -> (f64, f64);

    /// Shallowest level whose cells are smaller than `dist` on both axes,
    /// or the maximum level.
    fn level_for_distance(&self, dist: f64) -> usize;

    /// The children of `cell`, lazily. With a filter, children disjoint
    /// from it are skipped and children it covers are marked as leaves.
    fn next_level_cells<'a>(&self, cell: &Cell, filter: Option<&'a Shape>) -> CellIterator<'a> {
        FilterCellIterator::new(ChildCells::new(cell.clone(), self.max_levels()), filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_prefix() {
        let tree = QuadPrefixTree::new(Rectangle::new(-180.0, 180.0, -90.0, 90.0), 2).unwrap();
        let world = tree.world_cell();
        let child = world.child(1, 2).unwrap();
        let grandchild = child.child(3, 2).unwrap();
        assert_eq!(child.to_string(), "1");
        assert_eq!(grandchild.to_string(), "13+");
        assert!(world.is_prefix_of(&grandchild));
        assert!(child.is_prefix_of(&grandchild));
        assert!(!grandchild.is_prefix_of(&child));
        assert!(grandchild.child(0, 2).is_none());
    }

    #[test]
    fn test_geohash_cells() {
        let tree = GeohashPrefixTree::new(2).unwrap();
        let world = tree.world_cell();
        assert_eq!(world.child_count(), 32);
        let u = world.child(26, 2).unwrap();
        assert_eq!(u.to_string(), "u");
        let u4 = u.child(4, 2).unwrap();
        assert_eq!(u4.to_string(), "u4+");
        assert!(u.is_prefix_of(&u4));
    }
}
