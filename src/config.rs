//! Configuration for the kernel.
//!
//! ```rust
//! use geoshape::Config;
//!
//! let json = r#"{
//!     "prefix_tree": "geohash",
//!     "max_levels": 9
//! }"#;
//! let config = Config::from_json(json).unwrap();
//! let tree = config.build_prefix_tree().unwrap();
//! assert_eq!(tree.max_levels(), 9);
//! ```

use serde::de::Error;
use serde::{Deserialize, Serialize};

use geoshape_types::crs::CoordinateSystemConfig;

use crate::compute::spatial::DistanceMetric;
use crate::error::{GeoShapeError, Result};
use crate::operation::DEFAULT_DIST_ERR_PCT;
use crate::prefix::geohash::MAX_PRECISION;
use crate::prefix::quad::MAX_LEVELS_POSSIBLE;
use crate::prefix::{GeohashPrefixTree, QuadPrefixTree, SpatialPrefixTree};
use crate::shape::{GeometryFactory, Rectangle};

/// Which grid the prefix tree uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixTreeKind {
    /// Four children per cell over the coordinate system's world bounds.
    #[default]
    Quad,
    /// Thirty-two children per cell; geodetic systems only.
    Geohash,
}

impl PrefixTreeKind {
    pub const fn max_levels_possible(self) -> usize {
        match self {
            PrefixTreeKind::Quad => MAX_LEVELS_POSSIBLE,
            PrefixTreeKind::Geohash => MAX_PRECISION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// World bounds and longitude wrapping.
    #[serde(default)]
    pub crs: CoordinateSystemConfig,

    #[serde(default)]
    pub prefix_tree: PrefixTreeKind,

    /// Depth of the prefix tree (quad 1-29, geohash 1-24, default 12)
    #[serde(default = "Config::default_max_levels")]
    pub max_levels: usize,

    /// Fraction of a shape's size tolerated as indexing error (0-0.5)
    #[serde(default = "Config::default_dist_err_pct")]
    pub dist_err_pct: f64,

    /// Metric for circles. Unset means haversine when the coordinate
    /// system wraps longitude, euclidean otherwise.
    #[serde(default)]
    pub distance_metric: Option<DistanceMetric>,
}

impl Config {
    const fn default_max_levels() -> usize {
        12
    }

    const fn default_dist_err_pct() -> f64 {
        DEFAULT_DIST_ERR_PCT
    }

    pub fn planar(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            crs: CoordinateSystemConfig::planar(min_x, max_x, min_y, max_y),
            ..Self::default()
        }
    }

    pub fn with_crs(mut self, crs: CoordinateSystemConfig) -> Self {
        self.crs = crs;
        self
    }

    pub fn with_prefix_tree(mut self, kind: PrefixTreeKind, max_levels: usize) -> Self {
        self.prefix_tree = kind;
        self.max_levels = max_levels;
        self
    }

    pub fn with_dist_err_pct(mut self, pct: f64) -> Self {
        self.dist_err_pct = pct;
        self
    }

    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = Some(metric);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.crs.validate()?;

        let limit = self.prefix_tree.max_levels_possible();
        if self.max_levels < 1 || self.max_levels > limit {
            return Err(format!(
                "max_levels must be between 1 and {} for {:?} trees, got {}",
                limit, self.prefix_tree, self.max_levels
            ));
        }

        if self.prefix_tree == PrefixTreeKind::Geohash
            && self.crs != CoordinateSystemConfig::geodetic()
        {
            return Err("Geohash trees require the geodetic coordinate system".to_string());
        }

        if !(0.0..=0.5).contains(&self.dist_err_pct) {
            return Err(format!(
                "dist_err_pct must be between 0 and 0.5, got {}",
                self.dist_err_pct
            ));
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// A factory bound to this configuration's coordinate system.
    pub fn factory(&self) -> Result<GeometryFactory> {
        let factory = GeometryFactory::new(self.crs)?;
        Ok(match self.distance_metric {
            Some(metric) => factory.with_distance_metric(metric),
            None => factory,
        })
    }

    pub fn build_prefix_tree(&self) -> Result<Box<dyn SpatialPrefixTree>> {
        self.validate().map_err(GeoShapeError::InvalidConfig)?;
        log::debug!(
            "Building {:?} prefix tree with {} levels",
            self.prefix_tree,
            self.max_levels
        );
        let tree: Box<dyn SpatialPrefixTree> = match self.prefix_tree {
            PrefixTreeKind::Quad => {
                let crs = &self.crs;
                let world = Rectangle::new(crs.min_x, crs.max_x, crs.min_y, crs.max_y);
                Box::new(QuadPrefixTree::new(world, self.max_levels)?)
            }
            PrefixTreeKind::Geohash => Box::new(GeohashPrefixTree::new(self.max_levels)?),
        };
        Ok(tree)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crs: CoordinateSystemConfig::default(),
            prefix_tree: PrefixTreeKind::default(),
            max_levels: Self::default_max_levels(),
            dist_err_pct: Self::default_dist_err_pct(),
            distance_metric: None,
        }
    }
}
