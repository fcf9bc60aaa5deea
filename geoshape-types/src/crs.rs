use serde::{Deserialize, Serialize};

/// Minimum longitude / x of the geodetic world.
pub const MIN_LON_INCL: f64 = -180.0;
/// Maximum longitude / x of the geodetic world.
pub const MAX_LON_INCL: f64 = 180.0;
/// Minimum latitude / y of the geodetic world.
pub const MIN_LAT_INCL: f64 = -90.0;
/// Maximum latitude / y of the geodetic world.
pub const MAX_LAT_INCL: f64 = 90.0;

/// World bounds of a coordinate reference system.
///
/// Coordinates are always given x first (longitude), then y (latitude).
/// A geodetic system wraps on the x axis: a range with `min_x > max_x`
/// crosses the antimeridian instead of being empty.
///
/// # Examples
///
/// ```
/// use geoshape_types::crs::CoordinateSystemConfig;
///
/// let geo = CoordinateSystemConfig::geodetic();
/// assert_eq!(geo.width(), 360.0);
///
/// let plane = CoordinateSystemConfig::planar(0.0, 1000.0, 0.0, 500.0);
/// assert!(!plane.wraps_longitude);
/// assert!(plane.contains(250.0, 250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystemConfig {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    /// Whether the x axis wraps around (longitude on a sphere).
    #[serde(default)]
    pub wraps_longitude: bool,
}

impl CoordinateSystemConfig {
    /// Longitude/latitude degrees on a sphere, wrapping at ±180°.
    pub const fn geodetic() -> Self {
        Self {
            min_x: MIN_LON_INCL,
            max_x: MAX_LON_INCL,
            min_y: MIN_LAT_INCL,
            max_y: MAX_LAT_INCL,
            wraps_longitude: true,
        }
    }

    /// A flat, non-wrapping plane with the given bounds.
    pub const fn planar(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            wraps_longitude: false,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Inclusive bounds check. NaN is never contained.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Check the bounds are finite and non-empty on both axes.
    pub fn validate(&self) -> Result<(), String> {
        let all = [self.min_x, self.max_x, self.min_y, self.max_y];
        if all.iter().any(|v| !v.is_finite()) {
            return Err("Coordinate system bounds must be finite".to_string());
        }
        if self.min_x >= self.max_x {
            return Err(format!(
                "min_x ({}) must be < max_x ({})",
                self.min_x, self.max_x
            ));
        }
        if self.min_y >= self.max_y {
            return Err(format!(
                "min_y ({}) must be < max_y ({})",
                self.min_y, self.max_y
            ));
        }
        Ok(())
    }
}

impl Default for CoordinateSystemConfig {
    fn default() -> Self {
        Self::geodetic()
    }
}
