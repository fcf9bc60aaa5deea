//! Geohash text encoding and the base-32 prefix tree built on it.
//!
//! A geohash interleaves longitude and latitude bisection bits, longitude
//! first, five bits per character. Cells alternate between 8x4 and 4x8
//! subdivisions with the parity of the hash length.

use geoshape_types::crs::{MAX_LAT_INCL, MAX_LON_INCL, MIN_LAT_INCL, MIN_LON_INCL};

use super::{Cell, CellToken, SpatialPrefixTree};
use crate::error::{GeoShapeError, Result};
use crate::shape::{Point, Rectangle};

/// Longest supported geohash.
pub const MAX_PRECISION: usize = 24;

const BASE_32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

const BITS: [u8; 5] = [16, 8, 4, 2, 1];

/// `(lat_height, lon_width)` of a cell for each hash length.
const SIZES: [(f64, f64); MAX_PRECISION + 1] = size_table();

const fn size_table() -> [(f64, f64); MAX_PRECISION + 1] {
    let mut sizes = [(0.0, 0.0); MAX_PRECISION + 1];
    sizes[0] = (180.0, 360.0);
    let mut even = false;
    let mut i = 1;
    while i <= MAX_PRECISION {
        let (h, w) = sizes[i - 1];
        sizes[i] = if even { (h / 8.0, w / 4.0) } else { (h / 4.0, w / 8.0) };
        even = !even;
        i += 1;
    }
    sizes
}

fn char_index(c: u8) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    BASE_32.iter().position(|&b| b == c).map(|i| i as u8)
}

/// Encodes a point with `precision` characters.
///
/// # Examples
///
/// ```
/// use geoshape::prefix::geohash::encode_lat_lon;
///
/// assert_eq!(encode_lat_lon(57.64911, 10.40744, 11).unwrap(), "u4pruydqqvj");
/// assert!(encode_lat_lon(0.0, 0.0, 25).is_err());
/// ```
pub fn encode_lat_lon(lat: f64, lon: f64, precision: usize) -> Result<String> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(GeoShapeError::InvalidGeohash(format!(
            "precision must be between 1 and {}, got {}",
            MAX_PRECISION, precision
        )));
    }
    if !(MIN_LAT_INCL..=MAX_LAT_INCL).contains(&lat) || !(MIN_LON_INCL..=MAX_LON_INCL).contains(&lon)
    {
        return Err(GeoShapeError::InvalidCoordinate(format!(
            "({}, {}) is outside the geodetic world",
            lat, lon
        )));
    }

    let (mut lat_lo, mut lat_hi) = (MIN_LAT_INCL, MAX_LAT_INCL);
    let (mut lon_lo, mut lon_hi) = (MIN_LON_INCL, MAX_LON_INCL);
    let mut hash = String::with_capacity(precision);
    let mut even = true;
    let mut bit = 0;
    let mut ch = 0u8;

    while hash.len() < precision {
        if even {
            let mid = (lon_lo + lon_hi) / 2.0;
            if lon > mid {
                ch |= BITS[bit];
                lon_lo = mid;
            } else {
                lon_hi = mid;
            }
        } else {
            let mid = (lat_lo + lat_hi) / 2.0;
            if lat > mid {
                ch |= BITS[bit];
                lat_lo = mid;
            } else {
                lat_hi = mid;
            }
        }
        even = !even;
        if bit < 4 {
            bit += 1;
        } else {
            hash.push(BASE_32[ch as usize] as char);
            bit = 0;
            ch = 0;
        }
    }
    Ok(hash)
}

/// The cell a geohash names. Upper-case characters are accepted; the empty
/// hash is the whole world.
pub fn decode_boundary(geohash: &str) -> Result<Rectangle> {
    if geohash.len() > MAX_PRECISION {
        return Err(GeoShapeError::InvalidGeohash(format!(
            "{} is longer than {} characters",
            geohash, MAX_PRECISION
        )));
    }
    let (mut min_y, mut max_y) = (MIN_LAT_INCL, MAX_LAT_INCL);
    let (mut min_x, mut max_x) = (MIN_LON_INCL, MAX_LON_INCL);
    let mut even = true;

    for c in geohash.bytes() {
        let cd = char_index(c).ok_or_else(|| {
            GeoShapeError::InvalidGeohash(format!(
                "{} contains invalid character '{}'",
                geohash, c as char
            ))
        })?;
        for mask in BITS {
            if even {
                if cd & mask != 0 {
                    min_x = (min_x + max_x) / 2.0;
                } else {
                    max_x = (min_x + max_x) / 2.0;
                }
            } else if cd & mask != 0 {
                min_y = (min_y + max_y) / 2.0;
            } else {
                max_y = (min_y + max_y) / 2.0;
            }
            even = !even;
        }
    }
    Ok(Rectangle::new(min_x, max_x, min_y, max_y))
}

/// Center of the cell a geohash names.
pub fn decode(geohash: &str) -> Result<Point> {
    let rect = decode_boundary(geohash)?;
    Ok(Point::new(
        (rect.left() + rect.right()) / 2.0,
        (rect.bottom() + rect.top()) / 2.0,
    ))
}

/// The 32 child hashes of `base`, in alphabet order.
pub fn sub_geohashes(base: &str) -> Vec<String> {
    BASE_32
        .iter()
        .map(|&c| {
            let mut s = String::with_capacity(base.len() + 1);
            s.push_str(base);
            s.push(c as char);
            s
        })
        .collect()
}

/// `(lat_height, lon_width)` in degrees of cells with `hash_len` characters.
pub fn lookup_degrees_size_for_hash_len(hash_len: usize) -> (f64, f64) {
    SIZES[hash_len.min(MAX_PRECISION)]
}

/// Shortest hash length whose cells are smaller than both errors.
pub fn lookup_hash_len_for_width_height(lon_err: f64, lat_err: f64) -> usize {
    (1..MAX_PRECISION)
        .find(|&len| {
            let (h, w) = SIZES[len];
            h < lat_err && w < lon_err
        })
        .unwrap_or(MAX_PRECISION)
}

/// Prefix tree of geohash cells over the geodetic world.
#[derive(Debug, Clone, PartialEq)]
pub struct GeohashPrefixTree {
    max_levels: usize,
}

impl GeohashPrefixTree {
    pub fn new(max_levels: usize) -> Result<Self> {
        if max_levels == 0 || max_levels > MAX_PRECISION {
            return Err(GeoShapeError::InvalidConfig(format!(
                "geohash max_levels must be between 1 and {}, got {}",
                MAX_PRECISION, max_levels
            )));
        }
        Ok(Self { max_levels })
    }

    /// The cell for a geohash.
    pub fn cell(&self, geohash: &str) -> Result<Cell> {
        if geohash.len() > self.max_levels {
            return Err(GeoShapeError::InvalidGeohash(format!(
                "{} is deeper than the tree's {} levels",
                geohash, self.max_levels
            )));
        }
        let rect = decode_boundary(geohash)?;
        let level = geohash.len();
        Ok(Cell::new(
            CellToken::Geohash(geohash.to_ascii_lowercase()),
            level,
            rect,
            level == self.max_levels,
        ))
    }

    /// The cell of the given level containing a point.
    pub fn cell_for_point(&self, lon: f64, lat: f64, level: usize) -> Result<Cell> {
        let level = level.clamp(1, self.max_levels);
        self.cell(&encode_lat_lon(lat, lon, level)?)
    }
}

impl SpatialPrefixTree for GeohashPrefixTree {
    fn max_levels(&self) -> usize {
        self.max_levels
    }

    fn world_cell(&self) -> Cell {
        Cell::new(
            CellToken::Geohash(String::new()),
            0,
            Rectangle::new(MIN_LON_INCL, MAX_LON_INCL, MIN_LAT_INCL, MAX_LAT_INCL),
            false,
        )
    }

    fn cell_size(&self, level: usize) -> (f64, f64) {
        let (h, w) = lookup_degrees_size_for_hash_len(level);
        (w, h)
    }

    fn level_for_distance(&self, dist: f64) -> usize {
        if dist == 0.0 {
            return self.max_levels;
        }
        lookup_hash_len_for_width_height(dist, dist).clamp(1, self.max_levels)
    }
}

/// Child of a geohash cell at alphabet position `index`.
pub(crate) fn child_cell(parent: &str, index: usize, max_levels: usize) -> Option<Cell> {
    let c = *BASE_32.get(index)?;
    let mut hash = String::with_capacity(parent.len() + 1);
    hash.push_str(parent);
    hash.push(c as char);
    let rect = decode_boundary(&hash).ok()?;
    let level = hash.len();
    Some(Cell::new(
        CellToken::Geohash(hash),
        level,
        rect,
        level >= max_levels,
    ))
}

pub(crate) const CHILD_COUNT: usize = BASE_32.len();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hashes() {
        assert_eq!(encode_lat_lon(42.6, -5.6, 5).unwrap(), "ezs42");
        let center = decode("ezs42").unwrap();
        assert!((center.y() - 42.6).abs() < 0.03);
        assert!((center.x() + 5.6).abs() < 0.03);
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode_boundary("EZS42").unwrap(), decode_boundary("ezs42").unwrap());
    }

    #[test]
    fn test_invalid_characters() {
        for bad in ["a", "ezsi", "l0", "oo", "!"] {
            assert!(matches!(
                decode_boundary(bad),
                Err(GeoShapeError::InvalidGeohash(_))
            ));
        }
    }

    #[test]
    fn test_size_table() {
        assert_eq!(lookup_degrees_size_for_hash_len(0), (180.0, 360.0));
        assert_eq!(lookup_degrees_size_for_hash_len(1), (45.0, 45.0));
        assert_eq!(lookup_degrees_size_for_hash_len(2), (45.0 / 8.0, 45.0 / 4.0));
        let rect = decode_boundary("u4pruy").unwrap();
        let (h, w) = lookup_degrees_size_for_hash_len(6);
        assert!((rect.height() - h).abs() < 1e-12);
        assert!((rect.width() - w).abs() < 1e-12);
    }

    #[test]
    fn test_hash_len_for_error() {
        assert_eq!(lookup_hash_len_for_width_height(50.0, 50.0), 1);
        assert_eq!(lookup_hash_len_for_width_height(1.0, 1.0), 4);
        assert_eq!(lookup_hash_len_for_width_height(0.0, 0.0), MAX_PRECISION);
    }

    #[test]
    fn test_sub_geohashes() {
        let subs = sub_geohashes("u4");
        assert_eq!(subs.len(), 32);
        assert_eq!(subs[0], "u40");
        assert_eq!(subs[31], "u4z");
    }

    #[test]
    fn test_tree_levels() {
        assert!(GeohashPrefixTree::new(0).is_err());
        assert!(GeohashPrefixTree::new(25).is_err());
        let tree = GeohashPrefixTree::new(6).unwrap();
        assert_eq!(tree.level_for_distance(0.0), 6);
        assert_eq!(tree.level_for_distance(1.0), 4);
        assert_eq!(tree.level_for_distance(1e-9), 6);
        let cell = tree.cell_for_point(10.40744, 57.64911, 3).unwrap();
        assert_eq!(cell.token(), &CellToken::Geohash("u4p".to_string()));
    }
}
