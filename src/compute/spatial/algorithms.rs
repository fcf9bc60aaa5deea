//! Distance metrics and the small pieces of spherical geometry used by
//! circles and by the error-distance computations of the prefix trees.

use geo::{Distance, Euclidean, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Mean earth radius used by the haversine metric, in meters.
pub const EARTH_MEAN_RADIUS_METERS: f64 = 6_371_008.8;

/// Slack added to a radius before bounding it, to absorb rounding in the
/// haversine evaluation (7 cm).
const RADIUS_SLACK_METERS: f64 = 7e-2;

/// Tolerance around the latitude where a circle is widest.
pub const AXIS_LAT_ERROR: f64 = 0.1 / EARTH_MEAN_RADIUS_METERS * (180.0 / std::f64::consts::PI);

/// Distance metrics for circles and point distances.
///
/// - **Haversine**: great-circle distance on a spherical earth, in meters,
///   for longitude/latitude coordinates
/// - **Euclidean**: planar distance in coordinate units, for projected
///   coordinate systems only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Haversine formula - assumes spherical Earth
    #[default]
    Haversine,
    /// Euclidean distance - for planar/projected coordinates only
    Euclidean,
}

/// Calculate the distance between two points using the specified metric.
///
/// # Examples
///
/// ```rust
/// use geoshape::compute::spatial::algorithms::{distance_between, DistanceMetric};
///
/// // NYC to LA, roughly 3,944 km
/// let dist = distance_between(-74.0060, 40.7128, -118.2437, 34.0522, DistanceMetric::Haversine);
/// assert!(dist > 3_900_000.0);
///
/// let planar = distance_between(0.0, 0.0, 3.0, 4.0, DistanceMetric::Euclidean);
/// assert_eq!(planar, 5.0);
/// ```
pub fn distance_between(x1: f64, y1: f64, x2: f64, y2: f64, metric: DistanceMetric) -> f64 {
    let (p1, p2) = (Point::new(x1, y1), Point::new(x2, y2));
    match metric {
        DistanceMetric::Haversine => Haversine.distance(p1, p2),
        DistanceMetric::Euclidean => Euclidean.distance(p1, p2),
    }
}

/// Great-circle distance between two lon/lat points, in degrees of arc.
pub fn distance_degrees(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let meters = Haversine.distance(Point::new(lon1, lat1), Point::new(lon2, lat2));
    (meters / EARTH_MEAN_RADIUS_METERS).to_degrees()
}

/// Bounding box `(min_lon, max_lon, min_lat, max_lat)` of all points within
/// `radius_meters` of a center on the sphere.
///
/// When the box crosses the antimeridian `min_lon > max_lon`. When a pole
/// is within reach the box spans every longitude.
pub fn bounding_box_for_point_distance(
    center_lon: f64,
    center_lat: f64,
    radius_meters: f64,
) -> (f64, f64, f64, f64) {
    let rad_lat = center_lat.to_radians();
    let rad_lon = center_lon.to_radians();
    let rad_distance = (radius_meters + RADIUS_SLACK_METERS) / EARTH_MEAN_RADIUS_METERS;

    let min_lat_rad = -std::f64::consts::FRAC_PI_2;
    let max_lat_rad = std::f64::consts::FRAC_PI_2;
    let mut min_lat = rad_lat - rad_distance;
    let mut max_lat = rad_lat + rad_distance;
    let (min_lon, max_lon);

    if min_lat > min_lat_rad && max_lat < max_lat_rad {
        let delta_lon = (rad_distance.sin() / rad_lat.cos()).clamp(-1.0, 1.0).asin();
        let mut lo = rad_lon - delta_lon;
        if lo < -std::f64::consts::PI {
            lo += 2.0 * std::f64::consts::PI;
        }
        let mut hi = rad_lon + delta_lon;
        if hi > std::f64::consts::PI {
            hi -= 2.0 * std::f64::consts::PI;
        }
        min_lon = lo;
        max_lon = hi;
    } else {
        // a pole is within the distance
        min_lat = min_lat.max(min_lat_rad);
        max_lat = max_lat.min(max_lat_rad);
        min_lon = -std::f64::consts::PI;
        max_lon = std::f64::consts::PI;
    }

    (
        min_lon.to_degrees(),
        max_lon.to_degrees(),
        min_lat.to_degrees(),
        max_lat.to_degrees(),
    )
}

/// Latitude at which the circle around `center_lat` is widest in
/// longitude, i.e. where its bounding meridians are tangent.
pub fn axis_lat(center_lat: f64, radius_meters: f64) -> f64 {
    let half_pi = std::f64::consts::FRAC_PI_2;
    let l1 = center_lat.to_radians();
    let r = (radius_meters + RADIUS_SLACK_METERS) / EARTH_MEAN_RADIUS_METERS;

    // within radius range of a pole: the axis is the pole itself
    if l1.abs() + r >= half_pi {
        return if center_lat >= 0.0 { 90.0 } else { -90.0 };
    }

    // distance from the closest pole, forming a right triangle with the
    // bounding meridian
    let l1 = half_pi - l1.abs();
    let l2 = (l1.cos() / r.cos()).clamp(-1.0, 1.0).acos();
    let lat = (half_pi - l2).to_degrees();
    if center_lat >= 0.0 { lat } else { -lat }
}

/// Whether every longitude of `[min_lon, max_lon]` is within 90° of `lon`.
pub fn within_90_lon_degrees(lon: f64, min_lon: f64, max_lon: f64) -> bool {
    let mut lon = lon;
    if max_lon <= lon - 180.0 {
        lon -= 360.0;
    } else if min_lon >= lon + 180.0 {
        lon += 360.0;
    }
    max_lon - lon < 90.0 && lon - min_lon < 90.0
}

/// Sign of the cross product `(b - a) x (c - a)`: positive when `c` is to
/// the left of the directed line `a -> b`.
pub fn orient(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> i32 {
    let v = (bx - ax) * (cy - ay) - (by - ay) * (cx - ax);
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether the closed segments `a1-a2` and `b1-b2` share a point.
/// Touching and collinear overlap count as intersecting.
#[allow(clippy::too_many_arguments)]
pub fn segments_intersect(
    a1x: f64,
    a1y: f64,
    a2x: f64,
    a2y: f64,
    b1x: f64,
    b1y: f64,
    b2x: f64,
    b2y: f64,
) -> bool {
    if a1x.max(a2x) < b1x.min(b2x)
        || b1x.max(b2x) < a1x.min(a2x)
        || a1y.max(a2y) < b1y.min(b2y)
        || b1y.max(b2y) < a1y.min(a2y)
    {
        return false;
    }
    orient(a1x, a1y, a2x, a2y, b1x, b1y) * orient(a1x, a1y, a2x, a2y, b2x, b2y) <= 0
        && orient(b1x, b1y, b2x, b2y, a1x, a1y) * orient(b1x, b1y, b2x, b2y, a2x, a2y) <= 0
}
