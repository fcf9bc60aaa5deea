//! Coordinate codec: floating point coordinates to 32-bit integers and back.
//!
//! Each axis of a coordinate reference system is mapped linearly onto the
//! full `i32` range. The center of the axis encodes to `0`, so for the
//! geodetic world this is the classic latitude/longitude quantization
//! (`lat * 2^32 / 180`, `lon * 2^32 / 360`).
//!
//! `encode` rounds down and `encode_ceil` rounds up, so a range encoded as
//! `[encode_ceil(min), encode(max)]` never contains a quantized value whose
//! decoded coordinate falls outside the original range, and a query box
//! encoded the other way round (`encode(min)`, `encode_ceil(max)`) never
//! shrinks.

use crate::error::{GeoShapeError, Result};
use geoshape_types::crs::CoordinateSystemConfig;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Linear quantization of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEncoder {
    min: f64,
    max: f64,
    center: f64,
    /// Width of one quantization step.
    decode_step: f64,
}

impl AxisEncoder {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            center: (min + max) / 2.0,
            decode_step: (max - min) / TWO_POW_32,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn check(&self, value: f64) -> Result<()> {
        if value.is_nan() || value < self.min || value > self.max {
            return Err(GeoShapeError::InvalidCoordinate(format!(
                "value {} must be between {} and {}",
                value, self.min, self.max
            )));
        }
        Ok(())
    }

    /// Quantize rounding down. The axis maximum maps to `i32::MAX`.
    pub fn encode(&self, value: f64) -> Result<i32> {
        self.check(value)?;
        Ok(clamp_i32(((value - self.center) / self.decode_step).floor()))
    }

    /// Quantize rounding up.
    pub fn encode_ceil(&self, value: f64) -> Result<i32> {
        self.check(value)?;
        Ok(clamp_i32(((value - self.center) / self.decode_step).ceil()))
    }

    pub fn decode(&self, encoded: i32) -> f64 {
        self.center + encoded as f64 * self.decode_step
    }
}

fn clamp_i32(v: f64) -> i32 {
    if v >= i32::MAX as f64 {
        i32::MAX
    } else if v <= i32::MIN as f64 {
        i32::MIN
    } else {
        v as i32
    }
}

/// Encoder for both axes of a coordinate reference system.
///
/// # Examples
///
/// ```
/// use geoshape::encoding::CoordinateEncoder;
///
/// let enc = CoordinateEncoder::geodetic();
/// assert_eq!(enc.encode_y(0.0).unwrap(), 0);
/// assert_eq!(enc.encode_y(90.0).unwrap(), i32::MAX);
/// assert!(enc.encode_x(181.0).is_err());
///
/// let lat = enc.decode_y(enc.encode_y(45.5).unwrap());
/// assert!((lat - 45.5).abs() < 1e-7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateEncoder {
    pub x: AxisEncoder,
    pub y: AxisEncoder,
}

impl CoordinateEncoder {
    pub fn new(crs: &CoordinateSystemConfig) -> Self {
        Self {
            x: AxisEncoder::new(crs.min_x, crs.max_x),
            y: AxisEncoder::new(crs.min_y, crs.max_y),
        }
    }

    pub fn geodetic() -> Self {
        Self::new(&CoordinateSystemConfig::geodetic())
    }

    pub fn encode_x(&self, x: f64) -> Result<i32> {
        self.x.encode(x)
    }

    pub fn encode_x_ceil(&self, x: f64) -> Result<i32> {
        self.x.encode_ceil(x)
    }

    pub fn encode_y(&self, y: f64) -> Result<i32> {
        self.y.encode(y)
    }

    pub fn encode_y_ceil(&self, y: f64) -> Result<i32> {
        self.y.encode_ceil(y)
    }

    pub fn decode_x(&self, encoded: i32) -> f64 {
        self.x.decode(encoded)
    }

    pub fn decode_y(&self, encoded: i32) -> f64 {
        self.y.decode(encoded)
    }
}

/// Normalize a longitude in degrees into `[-180, 180]`.
pub fn normalize_lon_degrees(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let off = (lon + 180.0).rem_euclid(360.0);
    if off == 0.0 && lon > 0.0 {
        180.0
    } else {
        off - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geodetic_scale_matches_classic_quantization() {
        let enc = CoordinateEncoder::geodetic();
        let lat_scale = TWO_POW_32 / 180.0;
        let lon_scale = TWO_POW_32 / 360.0;
        for v in [-89.99, -44.1234, -0.000001, 0.0, 12.345678, 89.5] {
            assert_eq!(enc.encode_y(v).unwrap(), (v * lat_scale).floor() as i32);
        }
        for v in [-179.99, -91.77, 0.0, 33.3333, 179.5] {
            assert_eq!(enc.encode_x(v).unwrap(), (v * lon_scale).floor() as i32);
        }
    }

    #[test]
    fn test_extremes() {
        let enc = CoordinateEncoder::geodetic();
        assert_eq!(enc.encode_y(-90.0).unwrap(), i32::MIN);
        assert_eq!(enc.encode_y(90.0).unwrap(), i32::MAX);
        assert_eq!(enc.encode_x(-180.0).unwrap(), i32::MIN);
        assert_eq!(enc.encode_x(180.0).unwrap(), i32::MAX);
        assert_eq!(enc.encode_x_ceil(180.0).unwrap(), i32::MAX);
    }

    #[test]
    fn test_ceil_never_below_floor() {
        let enc = CoordinateEncoder::geodetic();
        for v in [-12.5, 0.1, 1e-9, 45.000001, 77.7] {
            let lo = enc.encode_y(v).unwrap();
            let hi = enc.encode_y_ceil(v).unwrap();
            assert!(hi >= lo);
            assert!(hi - lo <= 1);
            assert!(enc.decode_y(lo) <= v);
            assert!(enc.decode_y(hi) >= v);
        }
    }

    #[test]
    fn test_decode_stays_in_cell() {
        let enc = CoordinateEncoder::geodetic();
        for v in [-179.123456789, -1.0, 0.5, 100.987654321] {
            let e = enc.encode_x(v).unwrap();
            let d = enc.decode_x(e);
            assert!(d <= v);
            assert_eq!(enc.encode_x(d).unwrap(), e);
        }
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let enc = CoordinateEncoder::geodetic();
        assert!(matches!(
            enc.encode_y(90.1),
            Err(GeoShapeError::InvalidCoordinate(_))
        ));
        assert!(enc.encode_x(f64::NAN).is_err());
    }

    #[test]
    fn test_planar_axis() {
        let enc = CoordinateEncoder::new(&CoordinateSystemConfig::planar(0.0, 100.0, -50.0, 50.0));
        assert_eq!(enc.encode_x(50.0).unwrap(), 0);
        assert_eq!(enc.encode_x(0.0).unwrap(), i32::MIN);
        assert_eq!(enc.encode_y(0.0).unwrap(), 0);
        let d = enc.decode_x(enc.encode_x(73.25).unwrap());
        assert!((d - 73.25).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon_degrees(190.0), -170.0);
        assert_eq!(normalize_lon_degrees(-190.0), 170.0);
        assert_eq!(normalize_lon_degrees(540.0), 180.0);
        assert_eq!(normalize_lon_degrees(45.0), 45.0);
    }
}
