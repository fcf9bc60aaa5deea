//! Quantized grid predicates over the encoded coordinate space.
//!
//! The bounding box of a shape is split into at most [`ARITY`] x [`ARITY`]
//! power-of-two aligned cells. Each cell stores how it relates to the
//! shape, computed once when the grid is built. Point tests then cost one
//! lookup, and only points landing in cells that straddle the shape's
//! boundary fall back to the exact test.

use geoshape_types::Relation;

use crate::encoding::CoordinateEncoder;
use crate::error::Result;
use crate::shape::Rectangle;

/// Maximum number of cells along each axis.
pub const ARITY: i64 = 64;

const SPAN: i64 = 1 << 32;

/// Smallest shift such that `[a, b]` fits into [`ARITY`] cells of size
/// `2^shift`. Both bounds are in `[0, 2^33)`.
fn compute_shift(a: i64, b: i64) -> u32 {
    debug_assert!(a <= b);
    let mut shift = 1u32;
    while (b >> shift) - (a >> shift) >= ARITY {
        shift += 1;
    }
    shift
}

/// Moves an encoded value into `[0, 2^32)`.
fn unsigned(v: i32) -> i64 {
    v as i64 - i32::MIN as i64
}

/// Encoded `[min, max]` bounds of the cell at aligned offset `index`.
fn cell_bounds(index: i64, shift: u32) -> (i32, i32) {
    let min = ((index << shift) as u32).wrapping_add(0x8000_0000) as i32;
    let max = min.wrapping_add(((1i64 << shift) - 1) as i32);
    (min, max)
}

/// Precomputed cell relations for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPredicate {
    y_shift: u32,
    x_shift: u32,
    y_base: i64,
    x_base: i64,
    max_y_delta: i64,
    max_x_delta: i64,
    relations: Box<[u8]>,
}

impl GridPredicate {
    /// Builds the grid over `bbox`.
    ///
    /// `relate_cell` reports how a decoded cell rectangle relates to the
    /// shape, from the cell's point of view: `Within` for cells entirely
    /// inside the shape, `Disjoint` for cells entirely outside.
    pub fn build<F>(bbox: &Rectangle, encoder: &CoordinateEncoder, mut relate_cell: F) -> Result<Self>
    where
        F: FnMut(&Rectangle) -> Relation,
    {
        let min_y = encoder.encode_y_ceil(bbox.bottom())?;
        let max_y = encoder.encode_y(bbox.top())?;
        let min_x = encoder.encode_x_ceil(bbox.left())?;
        let max_x = encoder.encode_x(bbox.right())?;
        let crosses = bbox.crosses_dateline();

        if max_y < min_y || (!crosses && max_x < min_x) {
            // the box is narrower than one encoded step
            return Ok(Self::empty());
        }

        let min_y2 = unsigned(min_y);
        let max_y2 = unsigned(max_y);
        let y_shift = compute_shift(min_y2, max_y2);
        let y_base = min_y2 >> y_shift;
        let max_y_delta = (max_y2 >> y_shift) - y_base + 1;

        let min_x2 = unsigned(min_x);
        let mut max_x2 = unsigned(max_x);
        if crosses {
            max_x2 += SPAN;
        }
        let x_shift = compute_shift(min_x2, max_x2);
        let x_base = min_x2 >> x_shift;
        let max_x_delta = (max_x2 >> x_shift) - x_base + 1;

        let mut relations = vec![0u8; (max_y_delta * max_x_delta) as usize];
        for i in 0..max_y_delta {
            let (cell_min_y, cell_max_y) = cell_bounds(y_base + i, y_shift);
            let bottom = encoder.decode_y(cell_min_y);
            let top = encoder.decode_y(cell_max_y);
            for j in 0..max_x_delta {
                let (cell_min_x, cell_max_x) = cell_bounds(x_base + j, x_shift);
                let cell = Rectangle::new(
                    encoder.decode_x(cell_min_x),
                    encoder.decode_x(cell_max_x),
                    bottom,
                    top,
                );
                relations[(i * max_x_delta + j) as usize] = relate_cell(&cell).ordinal();
            }
        }

        log::debug!(
            "Built {}x{} grid predicate (shifts {}, {})",
            max_y_delta,
            max_x_delta,
            y_shift,
            x_shift
        );

        Ok(Self {
            y_shift,
            x_shift,
            y_base,
            x_base,
            max_y_delta,
            max_x_delta,
            relations: relations.into_boxed_slice(),
        })
    }

    fn empty() -> Self {
        Self {
            y_shift: 0,
            x_shift: 0,
            y_base: 0,
            x_base: 0,
            max_y_delta: 0,
            max_x_delta: 0,
            relations: Box::new([]),
        }
    }

    /// Number of cells in the grid. Zero when the bounding box was too
    /// thin to cover a single encoded value.
    pub fn cell_count(&self) -> usize {
        self.relations.len()
    }

    /// Stored relation of the cell holding an encoded point, or `None` if
    /// the point is outside the grid.
    pub fn relation_at(&self, encoded_y: i32, encoded_x: i32) -> Option<Relation> {
        if self.relations.is_empty() {
            return None;
        }
        let y = unsigned(encoded_y) >> self.y_shift;
        if y < self.y_base || y >= self.y_base + self.max_y_delta {
            return None;
        }
        let mut x = unsigned(encoded_x) >> self.x_shift;
        if x < self.x_base {
            // wrapped past the antimeridian
            x += 1i64 << (32 - self.x_shift);
        }
        if x - self.x_base >= self.max_x_delta {
            return None;
        }
        let offset = (y - self.y_base) * self.max_x_delta + (x - self.x_base);
        Relation::from_ordinal(self.relations[offset as usize])
    }

    /// Tests an encoded point, calling `exact` only for cells on the
    /// shape's boundary.
    pub fn test<F>(&self, encoded_y: i32, encoded_x: i32, exact: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        match self.relation_at(encoded_y, encoded_x) {
            None | Some(Relation::Disjoint) => false,
            Some(Relation::Within) => true,
            Some(_) => exact(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_shift() {
        assert_eq!(compute_shift(0, 10), 1);
        assert_eq!(compute_shift(0, 127), 1);
        assert_eq!(compute_shift(0, 128), 2);
        let shift = compute_shift(0, SPAN - 1);
        assert!((SPAN - 1) >> shift < ARITY);
    }

    #[test]
    fn test_cell_bounds_wraps() {
        let (min, max) = cell_bounds(0, 4);
        assert_eq!(min, i32::MIN);
        assert_eq!(max, i32::MIN + 15);
        // one full turn later lands on the same cell
        let (wmin, wmax) = cell_bounds(SPAN >> 4, 4);
        assert_eq!((wmin, wmax), (min, max));
    }

    #[test]
    fn test_grid_over_box() {
        let encoder = CoordinateEncoder::geodetic();
        let bbox = Rectangle::new(-10.0, 10.0, -10.0, 10.0);
        let inner = Rectangle::new(-5.0, 5.0, -5.0, 5.0);
        let grid = GridPredicate::build(&bbox, &encoder, |cell| inner.relate_rect(cell).transpose())
            .expect("grid");
        assert!(grid.cell_count() > 0);
        assert!(grid.cell_count() <= (ARITY * ARITY) as usize);

        let y = encoder.encode_y(0.0).expect("y");
        let x = encoder.encode_x(0.0).expect("x");
        assert!(grid.test(y, x, || true));

        let y = encoder.encode_y(9.0).expect("y");
        let x = encoder.encode_x(9.0).expect("x");
        assert!(!grid.test(y, x, || true));

        let y = encoder.encode_y(50.0).expect("y");
        assert_eq!(grid.relation_at(y, x), None);
    }

    #[test]
    fn test_degenerate_box_has_no_cells() {
        let encoder = CoordinateEncoder::geodetic();
        let bbox = Rectangle::new(1.0, 1.0, 2.0, 2.0);
        let grid = GridPredicate::build(&bbox, &encoder, |_| Relation::Within).expect("grid");
        // a single point may or may not cover an encoded value
        assert!(grid.cell_count() <= 1);
    }

    #[test]
    fn test_dateline_grid() {
        let encoder = CoordinateEncoder::geodetic();
        let bbox = Rectangle::new(170.0, -170.0, -5.0, 5.0);
        let grid = GridPredicate::build(&bbox, &encoder, |_| Relation::Within).expect("grid");
        let y = encoder.encode_y(0.0).expect("y");
        for lon in [175.0, 179.9, -179.9, -175.0] {
            let x = encoder.encode_x(lon).expect("x");
            assert!(grid.test(y, x, || false), "lon {lon}");
        }
        let x = encoder.encode_x(0.0).expect("x");
        assert!(!grid.test(y, x, || true));
    }
}
