//! Quad prefix tree with cells addressed by packed 64-bit tokens.
//!
//! Token layout, most significant bits first: two bits per level naming
//! the quadrant (0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right),
//! then unused bits, then the level in bits 1..=5 and the leaf flag in
//! bit 0. Two quadrant bits per level above six reserved low bits give at
//! most [`MAX_LEVELS_POSSIBLE`] levels.

use super::{Cell, CellToken, SpatialPrefixTree};
use crate::error::{GeoShapeError, Result};
use crate::shape::Rectangle;

pub const MAX_LEVELS_POSSIBLE: usize = 29;

pub(crate) const CHILD_COUNT: usize = 4;

const LEAF_BIT: u64 = 1;
const LEVEL_MASK: u64 = 0x1F;
const RESERVED_BITS: u64 = 0x3F;

/// Level stored in a token.
pub fn token_level(token: u64) -> usize {
    ((token >> 1) & LEVEL_MASK) as usize
}

pub fn token_is_leaf(token: u64) -> bool {
    token & LEAF_BIT == LEAF_BIT
}

pub(crate) fn with_leaf(token: u64) -> u64 {
    token | LEAF_BIT
}

/// Bit offset of the quadrant bits of `level` (1-based).
fn shift_for_level(level: usize) -> u32 {
    64 - (level as u32) * 2
}

/// Quadrant of the token's path at `level`.
pub fn token_quadrant(token: u64, level: usize) -> u8 {
    ((token >> shift_for_level(level)) & 0x3) as u8
}

/// Token of the `quadrant` child of `token`, without the leaf flag.
pub fn child_token(token: u64, quadrant: u8) -> u64 {
    let level = token_level(token) + 1;
    (token & !RESERVED_BITS) | ((quadrant as u64 & 0x3) << shift_for_level(level)) | ((level as u64) << 1)
}

/// The quadrant of `rect` selected by `quadrant`.
fn quadrant_rect(rect: &Rectangle, quadrant: u8) -> Rectangle {
    let mid_x = (rect.left() + rect.right()) / 2.0;
    let mid_y = (rect.bottom() + rect.top()) / 2.0;
    let (min_x, max_x) = if quadrant & 1 == 0 {
        (rect.left(), mid_x)
    } else {
        (mid_x, rect.right())
    };
    let (min_y, max_y) = if quadrant & 2 == 0 {
        (mid_y, rect.top())
    } else {
        (rect.bottom(), mid_y)
    };
    Rectangle::new(min_x, max_x, min_y, max_y)
}

/// Child cell of a quad cell.
pub(crate) fn child_cell(parent: &Cell, token: u64, index: usize, max_levels: usize) -> Option<Cell> {
    if index >= CHILD_COUNT || parent.level() >= max_levels {
        return None;
    }
    let quadrant = index as u8;
    let mut child = child_token(token, quadrant);
    let level = parent.level() + 1;
    let leaf = level >= max_levels;
    if leaf {
        child = with_leaf(child);
    }
    Some(Cell::new(
        CellToken::Quad(child),
        level,
        quadrant_rect(parent.rectangle(), quadrant),
        leaf,
    ))
}

/// Prefix tree splitting the world into quadrants at every level.
///
/// # Examples
///
/// ```
/// use geoshape::prefix::{QuadPrefixTree, SpatialPrefixTree};
/// use geoshape::shape::Rectangle;
///
/// let tree = QuadPrefixTree::new(Rectangle::new(-180.0, 180.0, -90.0, 90.0), 3).unwrap();
/// let children: Vec<_> = tree.next_level_cells(&tree.world_cell(), None).collect();
/// assert_eq!(children.len(), 4);
/// assert_eq!(*children[1].rectangle(), Rectangle::new(0.0, 180.0, 0.0, 90.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuadPrefixTree {
    world: Rectangle,
    max_levels: usize,
    level_w: Vec<f64>,
    level_h: Vec<f64>,
}

impl QuadPrefixTree {
    pub fn new(world: Rectangle, max_levels: usize) -> Result<Self> {
        if max_levels == 0 || max_levels > MAX_LEVELS_POSSIBLE {
            return Err(GeoShapeError::InvalidConfig(format!(
                "quad max_levels must be between 1 and {}, got {}",
                MAX_LEVELS_POSSIBLE, max_levels
            )));
        }
        if !world.is_finite() || !world.has_area() || world.crosses_dateline() {
            return Err(GeoShapeError::InvalidConfig(format!(
                "invalid world bounds {:?}",
                world
            )));
        }
        let mut level_w = Vec::with_capacity(max_levels + 1);
        let mut level_h = Vec::with_capacity(max_levels + 1);
        let (mut w, mut h) = (world.width(), world.height());
        for _ in 0..=max_levels {
            level_w.push(w);
            level_h.push(h);
            w /= 2.0;
            h /= 2.0;
        }
        Ok(Self {
            world,
            max_levels,
            level_w,
            level_h,
        })
    }

    pub fn world_bounds(&self) -> &Rectangle {
        &self.world
    }

    /// Rebuilds a cell from its token.
    pub fn cell_from_token(&self, token: u64) -> Result<Cell> {
        let level = token_level(token);
        if level > self.max_levels {
            return Err(GeoShapeError::InvalidFormat(format!(
                "token level {} exceeds the tree's {} levels",
                level, self.max_levels
            )));
        }
        let rect = (1..=level).fold(self.world, |rect, l| {
            quadrant_rect(&rect, token_quadrant(token, l))
        });
        Ok(Cell::new(
            CellToken::Quad(token),
            level,
            rect,
            token_is_leaf(token) || level == self.max_levels,
        ))
    }

    /// The cell of the given level containing a point.
    pub fn cell_for_point(&self, x: f64, y: f64, level: usize) -> Result<Cell> {
        if !self.world.contains_point(x, y) {
            return Err(GeoShapeError::InvalidCoordinate(format!(
                "({}, {}) is outside {:?}",
                x, y, self.world
            )));
        }
        let level = level.clamp(1, self.max_levels);
        let mut cell = self.world_cell();
        for _ in 0..level {
            let rect = cell.rectangle();
            let mid_x = (rect.left() + rect.right()) / 2.0;
            let mid_y = (rect.bottom() + rect.top()) / 2.0;
            let quadrant = u8::from(x > mid_x) | (u8::from(y < mid_y) << 1);
            match cell.child(quadrant as usize, self.max_levels) {
                Some(child) => cell = child,
                None => break,
            }
        }
        Ok(cell)
    }

    pub fn terms(&self) -> QuadTermsEnum {
        QuadTermsEnum::new(0, self.max_levels)
    }
}

impl SpatialPrefixTree for QuadPrefixTree {
    fn max_levels(&self) -> usize {
        self.max_levels
    }

    fn world_cell(&self) -> Cell {
        Cell::new(CellToken::Quad(0), 0, self.world, false)
    }

    fn cell_size(&self, level: usize) -> (f64, f64) {
        let level = level.min(self.max_levels);
        (self.level_w[level], self.level_h[level])
    }

    fn level_for_distance(&self, dist: f64) -> usize {
        if dist == 0.0 {
            return self.max_levels;
        }
        (1..self.max_levels)
            .find(|&level| dist > self.level_w[level] && dist > self.level_h[level])
            .unwrap_or(self.max_levels)
    }
}

/// Depth-first enumeration of quad tokens without materializing cells.
///
/// `next_cell(true)` descends into the first child when possible; passing
/// `false` skips the current cell's subtree and moves to its next sibling,
/// popping up a level after the last quadrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadTermsEnum {
    term: u64,
    max_levels: usize,
}

impl QuadTermsEnum {
    pub fn new(term: u64, max_levels: usize) -> Self {
        Self {
            term,
            max_levels: max_levels.min(MAX_LEVELS_POSSIBLE),
        }
    }

    pub fn term(&self) -> u64 {
        self.term
    }

    pub fn level(&self) -> usize {
        token_level(self.term)
    }

    /// Whether the token is the last one at `level`: every quadrant up to
    /// that level is the bottom-right one.
    pub fn is_end(&self, level: usize) -> bool {
        if level == 0 {
            return false;
        }
        let all_last = (1u64 << (level * 2)) - 1;
        self.term != 0 && (self.term >> shift_for_level(level)) == all_last
    }

    fn is_last_quad(&self, shift: u32) -> bool {
        (self.term >> shift) & 0x3 == 0x3
    }

    fn next_level(&self) -> u64 {
        ((self.term >> 1) + 1) << 1
    }

    pub fn has_next(&self, descend: bool) -> bool {
        !((!descend && self.is_end(self.level())) || self.is_end(self.max_levels))
    }

    /// Advances to the next token, or returns `None` at the end.
    pub fn next_cell(&mut self, descend: bool) -> Option<u64> {
        if !self.has_next(descend) {
            return None;
        }
        let level = self.level();
        let next = if level == 0
            || (descend && !token_is_leaf(self.term) && level != self.max_levels)
        {
            self.next_level()
        } else {
            let shift = shift_for_level(level);
            let sibling = (self.term + (1u64 << shift)) & !LEAF_BIT;
            if self.is_last_quad(shift) {
                // carried into a parent level; drop the levels popped
                let popped = ((sibling >> shift).trailing_zeros() >> 1) as u64;
                ((sibling >> 1) - popped) << 1
            } else {
                sibling
            }
        };
        self.term = next;
        Some(next)
    }
}
