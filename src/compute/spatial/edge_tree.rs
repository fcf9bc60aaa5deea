//! Interval trees over polygon and line edges.
//!
//! Each ring or path becomes one [`Component`]: its segments sorted by
//! lowest y and laid out as a height-balanced binary tree, each node
//! remembering the largest y of its subtree. Point-in-polygon is an
//! eastward ray cast that only visits subtrees whose y interval can reach
//! the ray, and box crossing tests prune the same way.
//!
//! Relations computed here are from the box's point of view: `Contains`
//! means the box contains the component.

use geoshape_types::Relation;

use super::algorithms::segments_intersect;

/// A borrowed ring or path: parallel x and y coordinate slices.
#[derive(Debug, Clone, Copy)]
pub struct RingRef<'a> {
    pub xs: &'a [f64],
    pub ys: &'a [f64],
}

impl<'a> RingRef<'a> {
    pub fn new(xs: &'a [f64], ys: &'a [f64]) -> Self {
        Self { xs, ys }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Segment {
    fn low(&self) -> f64 {
        self.y1.min(self.y2)
    }

    fn high(&self) -> f64 {
        self.y1.max(self.y2)
    }

    /// Whether the eastward ray from `(x, y)` crosses this segment.
    /// Half-open in y so shared vertices are counted once.
    fn crosses_ray(&self, x: f64, y: f64) -> bool {
        (self.y1 > y) != (self.y2 > y)
            && x < (self.x1 - self.x2) * (y - self.y2) / (self.y1 - self.y2) + self.x2
    }

    fn crosses_box(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> bool {
        if (self.y1 < min_y && self.y2 < min_y)
            || (self.y1 > max_y && self.y2 > max_y)
            || (self.x1 < min_x && self.x2 < min_x)
            || (self.x1 > max_x && self.x2 > max_x)
        {
            return false;
        }
        let inside = |x: f64, y: f64| x >= min_x && x <= max_x && y >= min_y && y <= max_y;
        if inside(self.x1, self.y1) || inside(self.x2, self.y2) {
            return true;
        }
        let (x1, y1, x2, y2) = (self.x1, self.y1, self.x2, self.y2);
        segments_intersect(x1, y1, x2, y2, min_x, max_y, max_x, max_y)
            || segments_intersect(x1, y1, x2, y2, max_x, max_y, max_x, min_y)
            || segments_intersect(x1, y1, x2, y2, max_x, min_y, min_x, min_y)
            || segments_intersect(x1, y1, x2, y2, min_x, min_y, min_x, max_y)
    }
}

#[derive(Debug, Clone)]
struct EdgeNode {
    segment: Segment,
    low: f64,
    max: f64,
    left: Option<Box<EdgeNode>>,
    right: Option<Box<EdgeNode>>,
}

impl EdgeNode {
    /// Builds a balanced tree from segments already sorted by `low`.
    fn build(sorted: &[Segment]) -> Option<Box<EdgeNode>> {
        if sorted.is_empty() {
            return None;
        }
        let mid = sorted.len() / 2;
        let segment = sorted[mid];
        let left = Self::build(&sorted[..mid]);
        let right = Self::build(&sorted[mid + 1..]);
        let mut max = segment.high();
        if let Some(l) = &left {
            max = max.max(l.max);
        }
        if let Some(r) = &right {
            max = max.max(r.max);
        }
        Some(Box::new(EdgeNode {
            segment,
            low: segment.low(),
            max,
            left,
            right,
        }))
    }

    /// Parity of ray crossings in this subtree.
    fn contains(&self, x: f64, y: f64) -> bool {
        let mut res = false;
        if y <= self.max {
            if self.segment.crosses_ray(x, y) {
                res = true;
            }
            if let Some(left) = &self.left {
                res ^= left.contains(x, y);
            }
            if let Some(right) = &self.right
                && y >= self.low
            {
                res ^= right.contains(x, y);
            }
        }
        res
    }

    fn crosses(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> bool {
        if min_y > self.max {
            return false;
        }
        if self.segment.crosses_box(min_x, max_x, min_y, max_y) {
            return true;
        }
        if let Some(left) = &self.left
            && left.crosses(min_x, max_x, min_y, max_y)
        {
            return true;
        }
        match &self.right {
            Some(right) if max_y >= self.low => right.crosses(min_x, max_x, min_y, max_y),
            _ => false,
        }
    }

    /// Twice the signed shoelace sum over this subtree's segments.
    fn shoelace(&self) -> f64 {
        let s = &self.segment;
        let mut sum = s.x1 * s.y2 - s.x2 * s.y1;
        if let Some(left) = &self.left {
            sum += left.shoelace();
        }
        if let Some(right) = &self.right {
            sum += right.shoelace();
        }
        sum
    }

    fn len(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.len()) + self.right.as_ref().map_or(0, |n| n.len())
    }
}

/// Whether a component bounds an area or is an open path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Ring,
    Path,
}

/// One polygon (with its holes) or one line of an [`EdgeTree`].
#[derive(Debug, Clone)]
pub struct Component {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    kind: ComponentKind,
    edges: Option<Box<EdgeNode>>,
    holes: Option<Box<EdgeTree>>,
}

impl Component {
    fn new(ring: RingRef<'_>, kind: ComponentKind, holes: Option<Box<EdgeTree>>) -> Self {
        let n = ring.xs.len().min(ring.ys.len());
        let mut segments: Vec<Segment> = (1..n)
            .map(|i| Segment {
                x1: ring.xs[i - 1],
                y1: ring.ys[i - 1],
                x2: ring.xs[i],
                y2: ring.ys[i],
            })
            .collect();
        segments.sort_by(|a, b| a.low().total_cmp(&b.low()));

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for i in 0..n {
            min_x = min_x.min(ring.xs[i]);
            max_x = max_x.max(ring.xs[i]);
            min_y = min_y.min(ring.ys[i]);
            max_y = max_y.max(ring.ys[i]);
        }

        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            kind,
            edges: EdgeNode::build(&segments),
            holes,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn edge_count(&self) -> usize {
        self.edges.as_ref().map_or(0, |e| e.len())
    }

    /// Ray-cast point test; points inside a hole are outside. Paths contain
    /// nothing.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if self.kind == ComponentKind::Path
            || x < self.min_x
            || x > self.max_x
            || y < self.min_y
            || y > self.max_y
        {
            return false;
        }
        let inside = self.edges.as_ref().is_some_and(|e| e.contains(x, y));
        if inside && let Some(holes) = &self.holes {
            return !holes.contains(x, y);
        }
        inside
    }

    /// Whether any edge (including hole edges) crosses or touches the box.
    pub fn crosses(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> bool {
        if self
            .edges
            .as_ref()
            .is_some_and(|e| e.crosses(min_x, max_x, min_y, max_y))
        {
            return true;
        }
        self.holes
            .as_ref()
            .is_some_and(|h| h.crosses(min_x, max_x, min_y, max_y))
    }

    /// Relation of the box to this component.
    pub fn relate(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Relation {
        if max_x < self.min_x || min_x > self.max_x || max_y < self.min_y || min_y > self.max_y {
            return Relation::Disjoint;
        }
        if min_x <= self.min_x && max_x >= self.max_x && min_y <= self.min_y && max_y >= self.max_y
        {
            return Relation::Contains;
        }

        let crosses = || {
            self.edges
                .as_ref()
                .is_some_and(|e| e.crosses(min_x, max_x, min_y, max_y))
        };

        if self.kind == ComponentKind::Path {
            return if crosses() {
                Relation::Crosses
            } else {
                Relation::Disjoint
            };
        }

        if let Some(holes) = &self.holes {
            match holes.relate(min_x, max_x, min_y, max_y) {
                // box sits entirely inside a hole
                Relation::Within => return Relation::Disjoint,
                Relation::Disjoint => {}
                _ => return Relation::Crosses,
            }
        }

        let edges = match &self.edges {
            Some(edges) => edges,
            None => return Relation::Disjoint,
        };
        let corners = [
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
        ]
        .iter()
        .filter(|(x, y)| edges.contains(*x, *y))
        .count();

        match corners {
            4 if crosses() => Relation::Crosses,
            4 => Relation::Within,
            1..=3 => Relation::Crosses,
            _ if crosses() => Relation::Crosses,
            _ => Relation::Disjoint,
        }
    }

    /// Signed area of the ring alone, positive when counter-clockwise.
    pub fn signed_ring_area(&self) -> f64 {
        self.edges.as_ref().map_or(0.0, |e| e.shoelace() * 0.5)
    }

    /// Area of the ring with its holes' signed areas added in.
    pub fn area(&self) -> f64 {
        if self.kind == ComponentKind::Path {
            return 0.0;
        }
        let holes = self.holes.as_ref().map_or(0.0, |h| h.signed_area());
        (self.signed_ring_area() + holes).abs()
    }
}

/// A forest of edge trees, one per polygon or line.
#[derive(Debug, Clone)]
pub struct EdgeTree {
    components: Vec<Component>,
}

impl EdgeTree {
    /// Builds a tree over polygons given as `(shell, holes)` pairs.
    pub fn from_polygons<'a, I>(polygons: I) -> Self
    where
        I: IntoIterator<Item = (RingRef<'a>, Vec<RingRef<'a>>)>,
    {
        let components = polygons
            .into_iter()
            .map(|(shell, holes)| {
                let holes = if holes.is_empty() {
                    None
                } else {
                    Some(Box::new(EdgeTree {
                        components: holes
                            .into_iter()
                            .map(|h| Component::new(h, ComponentKind::Ring, None))
                            .collect(),
                    }))
                };
                Component::new(shell, ComponentKind::Ring, holes)
            })
            .collect::<Vec<_>>();
        log::debug!("Built edge tree over {} polygon(s)", components.len());
        Self { components }
    }

    /// Builds a tree over open paths.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = RingRef<'a>>,
    {
        let components = lines
            .into_iter()
            .map(|l| Component::new(l, ComponentKind::Path, None))
            .collect::<Vec<_>>();
        log::debug!("Built edge tree over {} line(s)", components.len());
        Self { components }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.components.iter().any(|c| c.contains(x, y))
    }

    pub fn crosses(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> bool {
        self.components
            .iter()
            .any(|c| c.crosses(min_x, max_x, min_y, max_y))
    }

    /// Relation of the box to the whole forest.
    ///
    /// A box within any component is within the forest, and crossing any
    /// component crosses it. Otherwise the box contains the forest only if
    /// it contains every component, and is disjoint only if it is disjoint
    /// from every component.
    pub fn relate(&self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Relation {
        let mut contained = 0;
        let mut disjoint = 0;
        for component in &self.components {
            match component.relate(min_x, max_x, min_y, max_y) {
                Relation::Within => return Relation::Within,
                Relation::Contains => contained += 1,
                Relation::Disjoint => disjoint += 1,
                _ => return Relation::Crosses,
            }
        }
        if disjoint == self.components.len() {
            Relation::Disjoint
        } else if contained == self.components.len() {
            Relation::Contains
        } else {
            Relation::Crosses
        }
    }

    /// Sum of the signed ring areas, without taking absolute values.
    pub fn signed_area(&self) -> f64 {
        self.components.iter().map(|c| c.signed_ring_area()).sum()
    }

    /// Sum of the per-polygon areas.
    pub fn area(&self) -> f64 {
        self.components.iter().map(|c| c.area()).sum()
    }
}
