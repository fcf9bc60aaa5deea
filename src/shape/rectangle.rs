//! Axis-aligned rectangles: both a shape and the query window every
//! `relate_box` call takes.

use geoshape_types::Relation;
use geoshape_types::crs::{MAX_LON_INCL, MIN_LON_INCL};

use super::Point;

/// An axis-aligned rectangle `[min_x, max_x] x [min_y, max_y]`, bounds
/// inclusive.
///
/// In a wrapping coordinate system `min_x > max_x` describes a rectangle
/// that crosses the antimeridian. [`Rectangle::new`] does not validate;
/// use the geometry factory for checked construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Rectangle {
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn left(&self) -> f64 {
        self.min_x
    }

    pub fn right(&self) -> f64 {
        self.max_x
    }

    pub fn bottom(&self) -> f64 {
        self.min_y
    }

    pub fn top(&self) -> f64 {
        self.max_y
    }

    pub fn crosses_dateline(&self) -> bool {
        self.min_x > self.max_x
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    pub fn width(&self) -> f64 {
        if self.crosses_dateline() {
            self.max_x - self.min_x + (MAX_LON_INCL - MIN_LON_INCL)
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        let y = (self.min_y + self.max_y) / 2.0;
        if !self.crosses_dateline() {
            return Point::new((self.min_x + self.max_x) / 2.0, y);
        }
        let mut x = self.min_x + self.width() / 2.0;
        if x > MAX_LON_INCL {
            x -= MAX_LON_INCL - MIN_LON_INCL;
        }
        Point::new(x, y)
    }

    pub fn has_area(&self) -> bool {
        self.min_x != self.max_x && self.min_y != self.max_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        if y < self.min_y || y > self.max_y {
            return false;
        }
        if self.crosses_dateline() {
            x >= self.min_x || x <= self.max_x
        } else {
            x >= self.min_x && x <= self.max_x
        }
    }

    /// The two halves of an antimeridian-crossing rectangle: east of
    /// `min_x` up to +180, and from -180 up to `max_x`.
    pub fn split_dateline(&self) -> (Rectangle, Rectangle) {
        (
            Rectangle::new(self.min_x, MAX_LON_INCL, self.min_y, self.max_y),
            Rectangle::new(MIN_LON_INCL, self.max_x, self.min_y, self.max_y),
        )
    }

    /// How this rectangle relates to `other`. `Contains` means this
    /// rectangle contains `other`; equal rectangles contain each other and
    /// report `Contains`.
    ///
    /// When either side crosses the antimeridian the longitude ranges are
    /// compared on the circle, so the answer does not depend on which side
    /// is split.
    pub fn relate_rect(&self, other: &Rectangle) -> Relation {
        if !self.crosses_dateline() && !other.crosses_dateline() {
            return self.relate_simple(other);
        }
        let x = self.relate_lon(other);
        let y = Span::of(self.min_y, self.max_y, other.min_y, other.max_y);
        Span::combine(x, y)
    }

    /// Longitude range `[min_x, max_x]` with the crossing end moved past
    /// +180.
    fn unwrapped_x(&self) -> (f64, f64) {
        if self.crosses_dateline() {
            (self.min_x, self.max_x + WORLD_WIDTH)
        } else {
            (self.min_x, self.max_x)
        }
    }

    fn relate_lon(&self, other: &Rectangle) -> Span {
        match (self.width() >= WORLD_WIDTH, other.width() >= WORLD_WIDTH) {
            (true, true) => return Span::Equal,
            (true, false) => return Span::Contains,
            (false, true) => return Span::Within,
            (false, false) => {}
        }
        let (a0, a1) = self.unwrapped_x();
        let (b0, b1) = other.unwrapped_x();
        let mut found = None;
        for shift in [-WORLD_WIDTH, 0.0, WORLD_WIDTH] {
            let span = Span::of(a0, a1, b0 + shift, b1 + shift);
            if span == Span::Disjoint {
                continue;
            }
            // meeting at both ends of the circle
            if found.is_some() {
                return Span::Overlaps;
            }
            found = Some(span);
        }
        found.unwrap_or(Span::Disjoint)
    }

    fn relate_simple(&self, other: &Rectangle) -> Relation {
        if other.max_x < self.min_x
            || other.min_x > self.max_x
            || other.max_y < self.min_y
            || other.min_y > self.max_y
        {
            return Relation::Disjoint;
        }
        if other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
        {
            return Relation::Contains;
        }
        if self.min_x >= other.min_x
            && self.max_x <= other.max_x
            && self.min_y >= other.min_y
            && self.max_y <= other.max_y
        {
            return Relation::Within;
        }
        Relation::Crosses
    }
}

const WORLD_WIDTH: f64 = MAX_LON_INCL - MIN_LON_INCL;

/// How one closed interval relates to another on a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Disjoint,
    Equal,
    Contains,
    Within,
    Overlaps,
}

impl Span {
    fn of(a0: f64, a1: f64, b0: f64, b1: f64) -> Span {
        if b1 < a0 || b0 > a1 {
            Span::Disjoint
        } else if a0 == b0 && a1 == b1 {
            Span::Equal
        } else if b0 >= a0 && b1 <= a1 {
            Span::Contains
        } else if a0 >= b0 && a1 <= b1 {
            Span::Within
        } else {
            Span::Overlaps
        }
    }

    fn combine(x: Span, y: Span) -> Relation {
        if x == Span::Disjoint || y == Span::Disjoint {
            return Relation::Disjoint;
        }
        let covers = |s: Span| matches!(s, Span::Equal | Span::Contains);
        let covered = |s: Span| matches!(s, Span::Equal | Span::Within);
        if covers(x) && covers(y) {
            Relation::Contains
        } else if covered(x) && covered(y) {
            Relation::Within
        } else {
            Relation::Crosses
        }
    }
}

/// Combines a shape's relations to the two halves of an
/// antimeridian-crossing query box.
pub(crate) fn combine_box_halves(east: Relation, west: Relation) -> Relation {
    use Relation::*;
    match (east, west) {
        (Disjoint, Disjoint) => Disjoint,
        (Within, Disjoint) | (Disjoint, Within) | (Within, Within) => Within,
        (Contains, Contains) => Contains,
        _ => Crosses,
    }
}

/// Combines the relations of the two parts of an antimeridian-crossing
/// shape to one query box.
pub(crate) fn combine_shape_parts(east: Relation, west: Relation) -> Relation {
    use Relation::*;
    match (east, west) {
        (Disjoint, Disjoint) => Disjoint,
        (Within, Within) => Within,
        (Contains, _) | (_, Contains) => Contains,
        _ => Crosses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relate_rect() {
        let outer = Rectangle::new(0.0, 10.0, 0.0, 10.0);
        let inner = Rectangle::new(2.0, 3.0, 2.0, 3.0);
        let overlapping = Rectangle::new(5.0, 15.0, 5.0, 15.0);
        let far = Rectangle::new(20.0, 30.0, 20.0, 30.0);

        assert_eq!(outer.relate_rect(&inner), Relation::Contains);
        assert_eq!(inner.relate_rect(&outer), Relation::Within);
        assert_eq!(outer.relate_rect(&overlapping), Relation::Crosses);
        assert_eq!(outer.relate_rect(&far), Relation::Disjoint);
        assert_eq!(outer.relate_rect(&outer), Relation::Contains);
    }

    #[test]
    fn test_touching_edges_are_not_disjoint() {
        let a = Rectangle::new(0.0, 1.0, 0.0, 1.0);
        let b = Rectangle::new(1.0, 2.0, 0.0, 1.0);
        assert_eq!(a.relate_rect(&b), Relation::Crosses);
    }

    #[test]
    fn test_dateline_query_box() {
        let query = Rectangle::new(170.0, -170.0, -10.0, 10.0);
        assert!(query.crosses_dateline());
        assert_eq!(query.width(), 20.0);

        let east = Rectangle::new(172.0, 175.0, 0.0, 1.0);
        let west = Rectangle::new(-175.0, -172.0, 0.0, 1.0);
        let outside = Rectangle::new(0.0, 10.0, 0.0, 1.0);
        assert_eq!(east.relate_rect(&query), Relation::Within);
        assert_eq!(west.relate_rect(&query), Relation::Within);
        assert_eq!(outside.relate_rect(&query), Relation::Disjoint);
        assert_eq!(query.relate_rect(&east), Relation::Contains);
        assert_eq!(query.relate_rect(&outside), Relation::Disjoint);

        let spanning = Rectangle::new(160.0, 175.0, 0.0, 1.0);
        assert_eq!(spanning.relate_rect(&query), Relation::Crosses);
    }

    #[test]
    fn test_both_cross_dateline() {
        let inner = Rectangle::new(170.0, -170.0, -5.0, 5.0);
        let outer = Rectangle::new(160.0, -160.0, -10.0, 10.0);
        assert_eq!(inner.relate_rect(&outer), Relation::Within);
        assert_eq!(outer.relate_rect(&inner), Relation::Contains);
        assert_eq!(inner.relate_rect(&inner), Relation::Contains);

        let shifted = Rectangle::new(175.0, -150.0, -5.0, 5.0);
        assert_eq!(inner.relate_rect(&shifted), Relation::Crosses);
        assert_eq!(shifted.relate_rect(&inner), Relation::Crosses);
    }

    #[test]
    fn test_world_rect_contains_crossing_rect() {
        let world = Rectangle::new(-180.0, 180.0, -90.0, 90.0);
        let crossing = Rectangle::new(170.0, -170.0, -5.0, 5.0);
        assert_eq!(world.relate_rect(&crossing), Relation::Contains);
        assert_eq!(crossing.relate_rect(&world), Relation::Within);

        let west = Rectangle::new(-180.0, 0.0, -90.0, 90.0);
        assert_eq!(west.relate_rect(&crossing), Relation::Crosses);
        assert_eq!(crossing.relate_rect(&west), Relation::Crosses);
    }

    #[test]
    fn test_dateline_center_and_contains() {
        let r = Rectangle::new(170.0, -170.0, -10.0, 10.0);
        assert_eq!(r.center(), Point::new(180.0, 0.0));
        assert!(r.contains_point(179.0, 0.0));
        assert!(r.contains_point(-179.0, 0.0));
        assert!(!r.contains_point(0.0, 0.0));

        let r = Rectangle::new(175.0, -165.0, 0.0, 0.0);
        assert_eq!(r.center(), Point::new(-175.0, 0.0));
    }

    #[test]
    fn test_area() {
        let r = Rectangle::new(0.0, 2.0, 0.0, 3.0);
        assert!(r.has_area());
        assert_eq!(r.area(), 6.0);
        assert!(!Rectangle::new(1.0, 1.0, 0.0, 3.0).has_area());
    }

    #[test]
    fn test_combine_tables() {
        use Relation::*;
        assert_eq!(combine_box_halves(Within, Disjoint), Within);
        assert_eq!(combine_box_halves(Contains, Disjoint), Crosses);
        assert_eq!(combine_box_halves(Contains, Contains), Contains);
        assert_eq!(combine_shape_parts(Within, Disjoint), Crosses);
        assert_eq!(combine_shape_parts(Contains, Disjoint), Contains);
        assert_eq!(combine_shape_parts(Disjoint, Disjoint), Disjoint);
    }
}
