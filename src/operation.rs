//! Spatial operations: the named predicates a query evaluates against an
//! indexed shape, and the arguments that carry one.

use std::fmt;

use geoshape_types::Relation;
use geoshape_types::crs::CoordinateSystemConfig;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::compute::spatial::algorithms::distance_degrees;
use crate::error::{GeoShapeError, Result};
use crate::shape::Shape;

/// Default fraction of a shape's size accepted as indexing error.
pub const DEFAULT_DIST_ERR_PCT: f64 = 0.025;

/// A spatial predicate between an indexed shape and a query shape.
///
/// `Contains` and `Within` are boundary-neutral (OGC "Covers" and
/// "CoveredBy"): equal shapes satisfy both. `Overlaps` is evaluated like
/// `Intersects` because boundaries are not modeled separately from
/// interiors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialOperation {
    BboxIntersects,
    BboxWithin,
    Contains,
    Intersects,
    Equals,
    Disjoint,
    Within,
    Overlaps,
}

static REGISTRY: Lazy<FxHashMap<String, SpatialOperation>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for op in SpatialOperation::ALL {
        map.insert(op.name().to_uppercase(), op);
        for alias in op.aliases() {
            map.insert(alias.to_uppercase(), op);
        }
    }
    map
});

impl SpatialOperation {
    pub const ALL: [SpatialOperation; 8] = [
        SpatialOperation::BboxIntersects,
        SpatialOperation::BboxWithin,
        SpatialOperation::Contains,
        SpatialOperation::Intersects,
        SpatialOperation::Equals,
        SpatialOperation::Disjoint,
        SpatialOperation::Within,
        SpatialOperation::Overlaps,
    ];

    /// Name used in query strings.
    pub const fn name(self) -> &'static str {
        match self {
            SpatialOperation::BboxIntersects => "BBoxIntersects",
            SpatialOperation::BboxWithin => "BBoxWithin",
            SpatialOperation::Contains => "Contains",
            SpatialOperation::Intersects => "Intersects",
            SpatialOperation::Equals => "Equals",
            SpatialOperation::Disjoint => "Disjoint",
            SpatialOperation::Within => "Within",
            SpatialOperation::Overlaps => "Overlaps",
        }
    }

    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            SpatialOperation::BboxWithin => &["BBoxCoveredBy"],
            SpatialOperation::Contains => &["Covers"],
            SpatialOperation::Within => &["CoveredBy"],
            _ => &[],
        }
    }

    /// Looks an operation up by name or alias, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoshape::operation::SpatialOperation;
    ///
    /// assert_eq!(SpatialOperation::for_name("coveredby").unwrap(), SpatialOperation::Within);
    /// assert_eq!(SpatialOperation::for_name("INTERSECTS").unwrap(), SpatialOperation::Intersects);
    /// assert!(SpatialOperation::for_name("touches").is_err());
    /// ```
    pub fn for_name(name: &str) -> Result<SpatialOperation> {
        let key = name.to_uppercase();
        REGISTRY
            .get(&key)
            .copied()
            .ok_or(GeoShapeError::UnknownOperation(key))
    }

    /// Whether `indexed` and `query` satisfy this operation.
    ///
    /// Fails when the shapes' relation is needed but not defined for the
    /// pair (see [`Shape::relate`]).
    pub fn evaluate(self, indexed: &Shape, query: &Shape) -> Result<bool> {
        Ok(match self {
            SpatialOperation::BboxIntersects => {
                Shape::Rectangle(indexed.bounding_box()).relate(query)?.intersects()
            }
            SpatialOperation::BboxWithin => {
                let bbox = Shape::Rectangle(indexed.bounding_box());
                bbox.relate(query)? == Relation::Within || bbox == *query
            }
            SpatialOperation::Contains => {
                indexed.relate(query)? == Relation::Contains || indexed == query
            }
            SpatialOperation::Intersects | SpatialOperation::Overlaps => {
                indexed.relate(query)?.intersects()
            }
            SpatialOperation::Equals => indexed == query,
            SpatialOperation::Disjoint => indexed.relate(query)? == Relation::Disjoint,
            SpatialOperation::Within => {
                indexed.relate(query)? == Relation::Within || indexed == query
            }
        })
    }
}

impl fmt::Display for SpatialOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distance from the center of a shape's bounding box to its nearer right
/// corner, scaled by `dist_err_pct`.
///
/// Geodetic distances are in degrees of arc, planar ones in coordinate
/// units. Points have no error distance.
pub fn calc_distance_from_err_pct(
    shape: &Shape,
    dist_err_pct: f64,
    crs: &CoordinateSystemConfig,
) -> Result<f64> {
    if !(0.0..=0.5).contains(&dist_err_pct) {
        return Err(GeoShapeError::InvalidConfig(format!(
            "distErrPct {} must be between [0 to 0.5]",
            dist_err_pct
        )));
    }
    if dist_err_pct == 0.0 || matches!(shape, Shape::Point(_)) {
        return Ok(0.0);
    }
    let bbox = shape.bounding_box();
    let center = bbox.center();
    // the top corner is nearer in the northern hemisphere
    let y = if center.y() >= 0.0 {
        bbox.top()
    } else {
        bbox.bottom()
    };
    let diagonal = if crs.wraps_longitude {
        distance_degrees(center.x(), center.y(), bbox.right(), y)
    } else {
        (bbox.right() - center.x()).hypot(y - center.y())
    };
    Ok(diagonal * dist_err_pct)
}

/// An operation with its query shape and accuracy settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialArgs {
    pub operation: SpatialOperation,
    pub shape: Shape,
    /// Acceptable error as a fraction of the shape's size, 0 to 0.5.
    pub dist_err_pct: Option<f64>,
    /// Acceptable error as an absolute distance.
    pub dist_err: Option<f64>,
}

impl SpatialArgs {
    pub fn new(operation: SpatialOperation, shape: Shape) -> Self {
        Self {
            operation,
            shape,
            dist_err_pct: None,
            dist_err: None,
        }
    }

    pub fn with_dist_err_pct(mut self, pct: f64) -> Self {
        self.dist_err_pct = Some(pct);
        self
    }

    pub fn with_dist_err(mut self, dist: f64) -> Self {
        self.dist_err = Some(dist);
        self
    }

    /// Rejects arguments that set both error forms, or an out-of-range
    /// percentage.
    pub fn validate(&self) -> Result<()> {
        if self.dist_err.is_some() && self.dist_err_pct.is_some() {
            return Err(GeoShapeError::InvalidConfig(
                "Only distErr or distErrPct can be specified.".to_string(),
            ));
        }
        if let Some(pct) = self.dist_err_pct
            && !(0.0..=0.5).contains(&pct)
        {
            return Err(GeoShapeError::InvalidConfig(format!(
                "distErrPct {} must be between [0 to 0.5]",
                pct
            )));
        }
        if let Some(dist) = self.dist_err
            && !(dist.is_finite() && dist >= 0.0)
        {
            return Err(GeoShapeError::InvalidConfig(format!(
                "distErr {} must be finite and non-negative",
                dist
            )));
        }
        Ok(())
    }

    /// The error distance: `dist_err` if set, else computed from
    /// `dist_err_pct` or `default_dist_err_pct`.
    pub fn resolve_dist_err(
        &self,
        crs: &CoordinateSystemConfig,
        default_dist_err_pct: f64,
    ) -> Result<f64> {
        if let Some(dist) = self.dist_err {
            return Ok(dist);
        }
        let pct = self.dist_err_pct.unwrap_or(default_dist_err_pct);
        calc_distance_from_err_pct(&self.shape, pct, crs)
    }

    /// Evaluates the operation with `indexed` on the left.
    pub fn evaluate(&self, indexed: &Shape) -> Result<bool> {
        self.operation.evaluate(indexed, &self.shape)
    }
}
