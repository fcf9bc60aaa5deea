//! Level-bounded depth-first traversal of a prefix tree against a shape.
//!
//! Traversal descends only into cells the shape crosses. Cells the shape
//! covers stop the descent as exact leaves; cells reaching the detail
//! level stop it as approximate leaves. The detail level is therefore the
//! knob trading accuracy for the number of cells.

use geoshape_types::Relation;
use geoshape_types::crs::{MAX_LAT_INCL, MAX_LON_INCL, MIN_LAT_INCL, MIN_LON_INCL};

use smallvec::{SmallVec, smallvec};

use super::{Cell, CellIterator, SpatialPrefixTree};
use crate::compute::spatial::DistanceMetric;
use crate::compute::spatial::algorithms::EARTH_MEAN_RADIUS_METERS;
use crate::encoding::normalize_lon_degrees;
use crate::error::{GeoShapeError, Result};
use crate::operation::calc_distance_from_err_pct;
use crate::shape::{GeometryFactory, Shape};

/// Level at which cells are small enough for `dist_err_pct` of `shape`.
pub fn detail_level<T>(
    tree: &T,
    shape: &Shape,
    dist_err_pct: f64,
    factory: &GeometryFactory,
) -> Result<usize>
where
    T: SpatialPrefixTree + ?Sized,
{
    let dist = calc_distance_from_err_pct(shape, dist_err_pct, factory.crs())?;
    Ok(tree.level_for_distance(dist))
}

/// The cells covering a shape, in depth-first order, parents before
/// children. Terminal cells are flagged as leaves.
pub struct CoveringCells<'a, T: SpatialPrefixTree + ?Sized> {
    tree: &'a T,
    shape: &'a Shape,
    detail_level: usize,
    // one iterator per level below the world cell
    stack: SmallVec<[CellIterator<'a>; 12]>,
}

impl<'a, T: SpatialPrefixTree + ?Sized> CoveringCells<'a, T> {
    pub fn new(tree: &'a T, shape: &'a Shape, detail_level: usize) -> Self {
        let detail_level = detail_level.clamp(1, tree.max_levels());
        let root = tree.next_level_cells(&tree.world_cell(), Some(shape));
        Self {
            tree,
            shape,
            detail_level,
            stack: smallvec![root],
        }
    }

    pub fn detail_level(&self) -> usize {
        self.detail_level
    }
}

impl<T: SpatialPrefixTree + ?Sized> Iterator for CoveringCells<'_, T> {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        loop {
            let top = self.stack.last_mut()?;
            let Some(mut cell) = top.next() else {
                self.stack.pop();
                continue;
            };
            if !cell.is_leaf() && cell.level() >= self.detail_level {
                cell.set_leaf();
            }
            if !cell.is_leaf() {
                self.stack
                    .push(self.tree.next_level_cells(&cell, Some(self.shape)));
            }
            log::trace!("Visiting cell {} ({:?})", cell, cell.shape_rel());
            return Some(cell);
        }
    }
}

/// The leaf cells of a shape's covering, collected.
pub fn cover<T>(tree: &T, shape: &Shape, detail_level: usize) -> Vec<Cell>
where
    T: SpatialPrefixTree + ?Sized,
{
    CoveringCells::new(tree, shape, detail_level)
        .filter(Cell::is_leaf)
        .collect()
}

/// Classification of a cell for a WITHIN query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMatch {
    /// The query covers the cell, or the cell is at the detail level and
    /// touches the query.
    Inside,
    /// The cell is disjoint from the query.
    Outside,
    /// Undecided; look at the children.
    Boundary,
}

/// Classifies `cell` against a WITHIN query shape.
pub fn classify_within(query: &Shape, cell: &Cell, detail_level: usize) -> CellMatch {
    match query.relate_box(cell.rectangle()) {
        Relation::Disjoint => CellMatch::Outside,
        Relation::Contains => CellMatch::Inside,
        _ if cell.level() >= detail_level => CellMatch::Inside,
        _ => CellMatch::Boundary,
    }
}

/// Whether every cell covering `indexed` at `detail_level` falls inside
/// `query`: an approximate test of `indexed` WITHIN `query`.
pub fn approx_within<T>(tree: &T, indexed: &Shape, query: &Shape, detail_level: usize) -> bool
where
    T: SpatialPrefixTree + ?Sized,
{
    let mut stack = vec![tree.world_cell()];
    let mut saw_leaf = false;
    while let Some(cell) = stack.pop() {
        for child in tree.next_level_cells(&cell, Some(indexed)) {
            let terminal = child.is_leaf() || child.level() >= detail_level;
            match classify_within(query, &child, detail_level) {
                CellMatch::Outside => return false,
                CellMatch::Inside => saw_leaf = true,
                CellMatch::Boundary if terminal => return false,
                CellMatch::Boundary => stack.push(child),
            }
        }
    }
    saw_leaf
}

/// Grows a query shape by `dist_err` so that cells approximating the
/// indexed shapes near its edge still count as inside.
///
/// Points become circles, circles grow their radius, and everything else
/// becomes its bounding box grown on every side, clamped to the world.
/// For geodetic factories `dist_err` is in degrees and circle radii grow by
/// the matching arc length.
pub fn buffer_shape(shape: &Shape, dist_err: f64, factory: &GeometryFactory) -> Result<Shape> {
    if !(dist_err.is_finite() && dist_err > 0.0) {
        return Err(GeoShapeError::InvalidConfig(format!(
            "distErr must be > 0, got {}",
            dist_err
        )));
    }
    let geodetic = factory.crs().wraps_longitude;
    let radius = match factory.distance_metric() {
        DistanceMetric::Haversine => dist_err.to_radians() * EARTH_MEAN_RADIUS_METERS,
        DistanceMetric::Euclidean => dist_err,
    };

    match shape {
        Shape::Point(p) => Ok(factory.circle(p.x(), p.y(), radius)?.into()),
        Shape::Circle(c) => {
            let mut r = c.radius() + radius;
            if c.metric() == DistanceMetric::Haversine {
                // half the globe
                r = r.min(std::f64::consts::PI * EARTH_MEAN_RADIUS_METERS);
            }
            Ok(factory.circle(c.center().x(), c.center().y(), r)?.into())
        }
        other => {
            let bbox = other.bounding_box();
            let crs = factory.crs();
            let mut min_x = bbox.left() - dist_err;
            let mut max_x = bbox.right() + dist_err;
            let mut min_y = bbox.bottom() - dist_err;
            let mut max_y = bbox.top() + dist_err;
            if geodetic {
                min_y = min_y.max(MIN_LAT_INCL);
                max_y = max_y.min(MAX_LAT_INCL);
                if min_y == MIN_LAT_INCL
                    || max_y == MAX_LAT_INCL
                    || bbox.width() + 2.0 * dist_err > MAX_LON_INCL - MIN_LON_INCL
                {
                    min_x = MIN_LON_INCL;
                    max_x = MAX_LON_INCL;
                } else {
                    min_x = normalize_lon_degrees(min_x);
                    max_x = normalize_lon_degrees(max_x);
                }
            } else {
                min_x = min_x.max(crs.min_x);
                max_x = max_x.min(crs.max_x);
                min_y = min_y.max(crs.min_y);
                max_y = max_y.min(crs.max_y);
            }
            Ok(factory.rectangle(min_x, max_x, min_y, max_y)?.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::{GeohashPrefixTree, QuadPrefixTree};
    use crate::shape::Rectangle;

    fn quad(levels: usize) -> QuadPrefixTree {
        QuadPrefixTree::new(Rectangle::new(-180.0, 180.0, -90.0, 90.0), levels).unwrap()
    }

    #[test]
    fn test_cover_quadrant() {
        let tree = quad(4);
        let shape = Shape::Rectangle(Rectangle::new(0.0, 180.0, 0.0, 90.0));
        let cells = cover(&tree, &shape, 4);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].level(), 1);
    }

    #[test]
    fn test_cover_stops_at_detail_level() {
        let tree = quad(8);
        let shape = Shape::Rectangle(Rectangle::new(1.0, 2.0, 1.0, 2.0));
        let all: Vec<Cell> = CoveringCells::new(&tree, &shape, 3).collect();
        assert!(all.iter().all(|c| c.level() <= 3));
        let leaves: Vec<&Cell> = all.iter().filter(|c| c.is_leaf()).collect();
        assert!(!leaves.is_empty());
        assert!(leaves.iter().all(|c| c.level() == 3));
        // every leaf intersects the shape
        for leaf in leaves {
            assert!(shape.relate_box(leaf.rectangle()).intersects());
        }
        // parents come before their children
        assert_eq!(all[0].level(), 1);
    }

    #[test]
    fn test_cover_union_contains_shape_area() {
        let tree = quad(6);
        let shape = Shape::Rectangle(Rectangle::new(-30.0, 40.0, -20.0, 10.0));
        let leaves = cover(&tree, &shape, 6);
        let area: f64 = leaves.iter().map(|c| c.rectangle().area()).sum();
        assert!(area >= 70.0 * 30.0);
    }

    #[test]
    fn test_geohash_cover() {
        let tree = GeohashPrefixTree::new(3).unwrap();
        let factory = GeometryFactory::geodetic();
        let shape: Shape = factory.point(10.40744, 57.64911).unwrap().into();
        let leaves = cover(&tree, &shape, 3);
        assert!(leaves.iter().any(|c| c.to_string() == "u4p+"));
        assert!(leaves.iter().all(|c| c.level() == 3));
    }

    #[test]
    fn test_detail_level() {
        let tree = quad(12);
        let factory = GeometryFactory::geodetic();
        let small: Shape = Rectangle::new(0.0, 1.0, 0.0, 1.0).into();
        let big: Shape = Rectangle::new(-90.0, 90.0, -45.0, 45.0).into();
        let small_level = detail_level(&tree, &small, 0.025, &factory).unwrap();
        let big_level = detail_level(&tree, &big, 0.025, &factory).unwrap();
        assert!(small_level > big_level);
        let point: Shape = factory.point(1.0, 1.0).unwrap().into();
        assert_eq!(detail_level(&tree, &point, 0.025, &factory).unwrap(), 12);
    }

    #[test]
    fn test_classify_within() {
        let tree = quad(4);
        let query = Shape::Rectangle(Rectangle::new(0.0, 180.0, 0.0, 90.0));
        let world = tree.world_cell();
        let cells: Vec<Cell> = tree.next_level_cells(&world, None).collect();
        assert_eq!(classify_within(&query, &cells[1], 4), CellMatch::Inside);
        assert_eq!(classify_within(&query, &cells[0], 4), CellMatch::Boundary);
        let far = Shape::Rectangle(Rectangle::new(10.0, 20.0, 10.0, 20.0));
        assert_eq!(classify_within(&far, &cells[2], 4), CellMatch::Outside);
    }

    #[test]
    fn test_approx_within() {
        let tree = quad(8);
        let indexed = Shape::Rectangle(Rectangle::new(10.0, 20.0, 10.0, 20.0));
        let big = Shape::Rectangle(Rectangle::new(0.0, 90.0, 0.0, 45.0));
        let small = Shape::Rectangle(Rectangle::new(12.0, 14.0, 12.0, 14.0));
        assert!(approx_within(&tree, &indexed, &big, 6));
        assert!(!approx_within(&tree, &indexed, &small, 6));
    }

    #[test]
    fn test_buffer_shape() {
        let factory = GeometryFactory::geodetic();
        let point: Shape = factory.point(0.0, 0.0).unwrap().into();
        let Shape::Circle(c) = buffer_shape(&point, 1.0, &factory).unwrap() else {
            panic!("point should buffer to a circle");
        };
        assert!((c.radius() - 1f64.to_radians() * EARTH_MEAN_RADIUS_METERS).abs() < 1e-6);

        let rect: Shape = Rectangle::new(178.0, 179.5, 0.0, 1.0).into();
        let Shape::Rectangle(r) = buffer_shape(&rect, 1.0, &factory).unwrap() else {
            panic!("rectangle should buffer to a rectangle");
        };
        assert!(r.crosses_dateline());
        assert_eq!(r.right(), -179.5);

        let polar: Shape = Rectangle::new(0.0, 1.0, 88.0, 89.5).into();
        let Shape::Rectangle(r) = buffer_shape(&polar, 1.0, &factory).unwrap() else {
            panic!("rectangle should buffer to a rectangle");
        };
        assert_eq!((r.left(), r.right(), r.top()), (-180.0, 180.0, 90.0));

        assert!(buffer_shape(&point, 0.0, &factory).is_err());
    }
}
