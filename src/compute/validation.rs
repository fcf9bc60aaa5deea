//! Construction-time validation of coordinates and coordinate arrays.
//!
//! Shapes are validated once, when the factory builds them. Invalid input is
//! rejected with [`GeoShapeError::InvalidCoordinate`] (values outside the
//! world bounds) or [`GeoShapeError::InvalidGeometry`] (malformed arrays),
//! never repaired.

use crate::error::{GeoShapeError, Result};
use geo::Point;
use geoshape_types::crs::CoordinateSystemConfig;

/// Validates that a coordinate is finite and inside the world bounds.
///
/// # Examples
///
/// ```
/// use geoshape::compute::validation::validate_coordinate;
/// use geoshape_types::crs::CoordinateSystemConfig;
///
/// let crs = CoordinateSystemConfig::geodetic();
/// assert!(validate_coordinate(&crs, -74.0060, 40.7128).is_ok());
///
/// // Invalid longitude
/// assert!(validate_coordinate(&crs, 200.0, 40.0).is_err());
///
/// // Invalid latitude
/// assert!(validate_coordinate(&crs, -74.0, 95.0).is_err());
/// ```
pub fn validate_coordinate(crs: &CoordinateSystemConfig, x: f64, y: f64) -> Result<()> {
    if !x.is_finite() {
        return Err(GeoShapeError::InvalidCoordinate(format!(
            "X must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(GeoShapeError::InvalidCoordinate(format!(
            "Y must be finite, got: {}",
            y
        )));
    }

    if !(crs.min_x..=crs.max_x).contains(&x) {
        return Err(GeoShapeError::InvalidCoordinate(format!(
            "X out of range [{}, {}]: {}",
            crs.min_x, crs.max_x, x
        )));
    }

    if !(crs.min_y..=crs.max_y).contains(&y) {
        return Err(GeoShapeError::InvalidCoordinate(format!(
            "Y out of range [{}, {}]: {}",
            crs.min_y, crs.max_y, y
        )));
    }

    Ok(())
}

/// Validates parallel coordinate arrays: equal lengths, at least
/// `min_points` entries, every coordinate in bounds.
///
/// # Examples
///
/// ```
/// use geoshape::compute::validation::validate_coordinates;
/// use geoshape_types::crs::CoordinateSystemConfig;
///
/// let crs = CoordinateSystemConfig::geodetic();
/// assert!(validate_coordinates(&crs, &[0.0, 1.0], &[0.0, 1.0], 2).is_ok());
/// assert!(validate_coordinates(&crs, &[0.0, 1.0], &[0.0], 1).is_err());
/// assert!(validate_coordinates(&crs, &[0.0], &[0.0], 2).is_err());
/// assert!(validate_coordinates(&crs, &[0.0, 999.0], &[0.0, 1.0], 2).is_err());
/// ```
pub fn validate_coordinates(
    crs: &CoordinateSystemConfig,
    xs: &[f64],
    ys: &[f64],
    min_points: usize,
) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(GeoShapeError::InvalidGeometry(format!(
            "x and y arrays must have the same length, got {} and {}",
            xs.len(),
            ys.len()
        )));
    }

    if xs.len() < min_points {
        return Err(GeoShapeError::InvalidGeometry(format!(
            "at least {} points required, got {}",
            min_points,
            xs.len()
        )));
    }

    for (idx, (x, y)) in xs.iter().zip(ys).enumerate() {
        validate_coordinate(crs, *x, *y).map_err(|e| {
            GeoShapeError::InvalidCoordinate(format!("Point at index {}: {}", idx, e))
        })?;
    }
    Ok(())
}

/// Validates that a ring has at least four points and ends where it starts.
pub fn validate_closed_ring(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() < 4 {
        return Err(GeoShapeError::InvalidGeometry(format!(
            "a polygon ring needs at least 4 points, got {}",
            xs.len()
        )));
    }
    let last = xs.len() - 1;
    if xs[0] != xs[last] || ys[0] != ys[last] {
        return Err(GeoShapeError::InvalidGeometry(format!(
            "first and last points of the polygon must be the same (it must close itself): \
             x[0]={} x[{}]={} y[0]={} y[{}]={}",
            xs[0], last, xs[last], ys[0], last, ys[last]
        )));
    }
    Ok(())
}

/// Validates a circle radius.
pub fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(GeoShapeError::InvalidGeometry(format!(
            "radius must be finite and non-negative, got: {}",
            radius
        )));
    }
    Ok(())
}

/// Validates multiple `geo` points.
///
/// # Examples
///
/// ```
/// use geoshape::compute::validation::validate_points;
/// use geoshape_types::crs::CoordinateSystemConfig;
/// use geo::Point;
///
/// let points = vec![
///     Point::new(-74.0, 40.7),
///     Point::new(-73.9, 40.8),
///     Point::new(999.0, 40.0), // Invalid
/// ];
///
/// let result = validate_points(&CoordinateSystemConfig::geodetic(), &points);
/// assert!(result.is_err());
/// ```
pub fn validate_points(crs: &CoordinateSystemConfig, points: &[Point]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_coordinate(crs, point.x(), point.y()).map_err(|e| {
            GeoShapeError::InvalidCoordinate(format!("Point at index {}: {}", idx, e))
        })?;
    }
    Ok(())
}

/// Validates all polygon coordinates (exterior and interior rings).
///
/// # Examples
///
/// ```
/// use geoshape::compute::validation::validate_polygon;
/// use geoshape_types::crs::CoordinateSystemConfig;
/// use geo::polygon;
///
/// let poly = polygon![
///     (x: -80.0, y: 35.0),
///     (x: -70.0, y: 35.0),
///     (x: -70.0, y: 45.0),
///     (x: -80.0, y: 45.0),
///     (x: -80.0, y: 35.0),
/// ];
///
/// assert!(validate_polygon(&CoordinateSystemConfig::geodetic(), &poly).is_ok());
/// ```
pub fn validate_polygon(crs: &CoordinateSystemConfig, polygon: &geo::Polygon) -> Result<()> {
    for (idx, coord) in polygon.exterior().coords().enumerate() {
        validate_coordinate(crs, coord.x, coord.y).map_err(|e| {
            GeoShapeError::InvalidCoordinate(format!("Exterior ring point at index {}: {}", idx, e))
        })?;
    }

    for (ring_idx, interior) in polygon.interiors().iter().enumerate() {
        for (idx, coord) in interior.coords().enumerate() {
            validate_coordinate(crs, coord.x, coord.y).map_err(|e| {
                GeoShapeError::InvalidCoordinate(format!(
                    "Interior ring {} point at index {}: {}",
                    ring_idx, idx, e
                ))
            })?;
        }
    }

    Ok(())
}
