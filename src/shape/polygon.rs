//! Polygons with holes, and multi-polygons.
//!
//! Both index their boundaries lazily: the edge tree on the first relate,
//! containment or area call, and the predicate grid on the first encoded
//! point test. Holes are expected to wind opposite to their shell; the
//! area of a polygon is the absolute value of the summed signed areas, so
//! a hole wound the same way as its shell is added instead of subtracted.
//! Self-intersecting rings are not rejected and their containment and area
//! results are undefined.

use geoshape_types::Relation;

use super::lazy::LazySlot;
use super::line::union_bounds;
use super::{MultiPoint, Rectangle};
use crate::compute::spatial::{EdgeTree, GridPredicate, RingRef};
use crate::encoding::CoordinateEncoder;
use crate::error::Result;

/// A closed ring plus zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    shell: MultiPoint,
    holes: Vec<Polygon>,
    encoder: CoordinateEncoder,
    tree: LazySlot<EdgeTree>,
    grid: LazySlot<GridPredicate>,
    area: LazySlot<f64>,
}

impl Polygon {
    pub(crate) fn from_parts(
        shell: MultiPoint,
        holes: Vec<Polygon>,
        encoder: CoordinateEncoder,
    ) -> Self {
        Self {
            shell,
            holes,
            encoder,
            tree: LazySlot::new(),
            grid: LazySlot::new(),
            area: LazySlot::new(),
        }
    }

    pub fn shell(&self) -> &MultiPoint {
        &self.shell
    }

    pub fn xs(&self) -> &[f64] {
        self.shell.xs()
    }

    pub fn ys(&self) -> &[f64] {
        self.shell.ys()
    }

    pub fn holes(&self) -> &[Polygon] {
        &self.holes
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.shell.bounding_box()
    }

    fn rings(&self) -> (RingRef<'_>, Vec<RingRef<'_>>) {
        (
            RingRef::new(self.xs(), self.ys()),
            self.holes
                .iter()
                .map(|h| RingRef::new(h.xs(), h.ys()))
                .collect(),
        )
    }

    pub fn edge_tree(&self) -> &EdgeTree {
        self.tree
            .get_or_init(|| EdgeTree::from_polygons([self.rings()]))
    }

    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        relate_area_tree(self.edge_tree(), rect)
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.edge_tree().contains(x, y)
    }

    pub fn area(&self) -> f64 {
        *self.area.get_or_init(|| self.edge_tree().area())
    }

    pub fn grid(&self) -> Result<&GridPredicate> {
        self.grid.get_or_try_init(|| {
            build_grid(&self.bounding_box(), &self.encoder, self.edge_tree())
        })
    }

    /// Point test on encoded coordinates through the predicate grid.
    pub fn point_inside_encoded(&self, encoded_x: i32, encoded_y: i32) -> Result<bool> {
        Ok(test_encoded(self.grid()?, &self.encoder, self.edge_tree(), encoded_x, encoded_y))
    }
}

/// One or more polygons. Areas are summed without correcting for overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
    bbox: Rectangle,
    encoder: CoordinateEncoder,
    tree: LazySlot<EdgeTree>,
    grid: LazySlot<GridPredicate>,
    area: LazySlot<f64>,
}

impl MultiPolygon {
    pub(crate) fn from_parts(polygons: Vec<Polygon>, encoder: CoordinateEncoder) -> Self {
        let bbox = union_bounds(polygons.iter().map(Polygon::bounding_box));
        Self {
            polygons,
            bbox,
            encoder,
            tree: LazySlot::new(),
            grid: LazySlot::new(),
            area: LazySlot::new(),
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.bbox
    }

    pub fn edge_tree(&self) -> &EdgeTree {
        self.tree.get_or_init(|| {
            EdgeTree::from_polygons(self.polygons.iter().map(Polygon::rings))
        })
    }

    pub fn relate_box(&self, rect: &Rectangle) -> Relation {
        relate_area_tree(self.edge_tree(), rect)
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.edge_tree().contains(x, y)
    }

    pub fn area(&self) -> f64 {
        *self.area.get_or_init(|| self.edge_tree().area())
    }

    pub fn grid(&self) -> Result<&GridPredicate> {
        self.grid
            .get_or_try_init(|| build_grid(&self.bbox, &self.encoder, self.edge_tree()))
    }

    pub fn point_inside_encoded(&self, encoded_x: i32, encoded_y: i32) -> Result<bool> {
        Ok(test_encoded(self.grid()?, &self.encoder, self.edge_tree(), encoded_x, encoded_y))
    }
}

fn relate_area_tree(tree: &EdgeTree, rect: &Rectangle) -> Relation {
    tree.relate(rect.left(), rect.right(), rect.bottom(), rect.top())
        .transpose()
}

fn build_grid(
    bbox: &Rectangle,
    encoder: &CoordinateEncoder,
    tree: &EdgeTree,
) -> Result<GridPredicate> {
    let grid = GridPredicate::build(bbox, encoder, |cell| {
        tree.relate(cell.left(), cell.right(), cell.bottom(), cell.top())
    })?;
    if grid.cell_count() == 0 {
        log::warn!("Predicate grid over {:?} has no cells", bbox);
    }
    Ok(grid)
}

fn test_encoded(
    grid: &GridPredicate,
    encoder: &CoordinateEncoder,
    tree: &EdgeTree,
    encoded_x: i32,
    encoded_y: i32,
) -> bool {
    grid.test(encoded_y, encoded_x, || {
        tree.contains(encoder.decode_x(encoded_x), encoder.decode_y(encoded_y))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(xs: &[f64], ys: &[f64]) -> MultiPoint {
        MultiPoint::from_parts(xs.to_vec(), ys.to_vec())
    }

    fn square(min: f64, max: f64) -> MultiPoint {
        ring(&[min, max, max, min, min], &[min, min, max, max, min])
    }

    #[test]
    fn test_unit_square_area() {
        let p = Polygon::from_parts(square(0.0, 1.0), vec![], CoordinateEncoder::geodetic());
        assert_eq!(p.area(), 1.0);
        assert_eq!(p.bounding_box(), Rectangle::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_relate_is_shape_side() {
        let p = Polygon::from_parts(square(0.0, 10.0), vec![], CoordinateEncoder::geodetic());
        assert_eq!(p.relate_box(&Rectangle::new(2.0, 3.0, 2.0, 3.0)), Relation::Contains);
        assert_eq!(p.relate_box(&Rectangle::new(-1.0, 11.0, -1.0, 11.0)), Relation::Within);
    }

    #[test]
    fn test_encoded_point_agrees_with_exact() {
        let enc = CoordinateEncoder::geodetic();
        let hole = Polygon::from_parts(square(4.0, 6.0), vec![], enc);
        let p = Polygon::from_parts(square(0.0, 10.0), vec![hole], enc);
        for (x, y) in [(1.0, 1.0), (5.0, 5.0), (9.9, 0.1), (11.0, 5.0), (6.5, 4.5)] {
            let ex = enc.encode_x(x).unwrap();
            let ey = enc.encode_y(y).unwrap();
            let exact = p.contains_point(enc.decode_x(ex), enc.decode_y(ey));
            assert_eq!(p.point_inside_encoded(ex, ey).unwrap(), exact, "({x}, {y})");
        }
    }

    #[test]
    fn test_multi_polygon_area_sums() {
        let enc = CoordinateEncoder::geodetic();
        let mp = MultiPolygon::from_parts(
            vec![
                Polygon::from_parts(square(0.0, 1.0), vec![], enc),
                Polygon::from_parts(square(5.0, 7.0), vec![], enc),
            ],
            enc,
        );
        assert_eq!(mp.area(), 5.0);
        assert!(mp.contains_point(6.0, 6.0));
        assert!(!mp.contains_point(3.0, 3.0));
    }
}
