//! Fixed-layout binary records for points, rectangles and circles.
//!
//! One type byte, then big-endian doubles:
//!
//! - point (1): x, y
//! - rectangle (2): min x, max x, min y, max y
//! - circle (3): center x, center y, radius
//!
//! Note the rectangle order differs from the WKB envelope.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::ensure_remaining;
use crate::error::{GeoShapeError, Result};
use crate::shape::{GeometryFactory, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LegacyShapeType {
    Null = 0,
    Point = 1,
    Rectangle = 2,
    Circle = 3,
}

impl LegacyShapeType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Null),
            1 => Some(Self::Point),
            2 => Some(Self::Rectangle),
            3 => Some(Self::Circle),
            _ => None,
        }
    }
}

pub fn to_legacy(shape: &Shape) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(1 + 4 * 8);
    write_legacy(shape, &mut buf)?;
    Ok(buf.freeze())
}

pub fn write_legacy(shape: &Shape, buf: &mut impl BufMut) -> Result<()> {
    match shape {
        Shape::Point(p) => {
            buf.put_u8(LegacyShapeType::Point as u8);
            buf.put_f64(p.x());
            buf.put_f64(p.y());
        }
        Shape::Rectangle(r) => {
            buf.put_u8(LegacyShapeType::Rectangle as u8);
            buf.put_f64(r.left());
            buf.put_f64(r.right());
            buf.put_f64(r.bottom());
            buf.put_f64(r.top());
        }
        Shape::Circle(c) => {
            buf.put_u8(LegacyShapeType::Circle as u8);
            buf.put_f64(c.center().x());
            buf.put_f64(c.center().y());
            buf.put_f64(c.radius());
        }
        other => {
            return Err(GeoShapeError::UnsupportedOperation(format!(
                "shape type {} not supported for legacy records",
                other.shape_type()
            )));
        }
    }
    Ok(())
}

/// Reads one record from the front of `buf`.
pub fn read_legacy(buf: &mut impl Buf, factory: &GeometryFactory) -> Result<Shape> {
    ensure_remaining(&*buf, 1)?;
    let tag = buf.get_u8();
    let kind = LegacyShapeType::from_byte(tag)
        .ok_or_else(|| GeoShapeError::InvalidFormat(format!("unknown legacy shape type {}", tag)))?;
    let fields = match kind {
        LegacyShapeType::Point => 2,
        LegacyShapeType::Rectangle => 4,
        LegacyShapeType::Circle => 3,
        LegacyShapeType::Null => {
            return Err(GeoShapeError::UnsupportedOperation(
                "unsupported shape type for unmarshalling".to_string(),
            ));
        }
    };
    ensure_remaining(&*buf, fields * 8)?;
    let shape = match kind {
        LegacyShapeType::Point => {
            let x = buf.get_f64();
            let y = buf.get_f64();
            factory.point(x, y)?.into()
        }
        LegacyShapeType::Rectangle => {
            let min_x = buf.get_f64();
            let max_x = buf.get_f64();
            let min_y = buf.get_f64();
            let max_y = buf.get_f64();
            factory.rectangle(min_x, max_x, min_y, max_y)?.into()
        }
        _ => {
            let x = buf.get_f64();
            let y = buf.get_f64();
            let radius = buf.get_f64();
            factory.circle(x, y, radius)?.into()
        }
    };
    Ok(shape)
}

pub fn from_legacy(bytes: &[u8], factory: &GeometryFactory) -> Result<Shape> {
    let mut slice = bytes;
    read_legacy(&mut slice, factory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_layout() {
        let f = GeometryFactory::geodetic();
        let shape: Shape = f.rectangle(-10.0, 10.0, -5.0, 5.0).unwrap().into();
        let bytes = to_legacy(&shape).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 2);
        let fields: Vec<f64> = bytes[1..]
            .chunks(8)
            .map(|c| f64::from_be_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(fields, vec![-10.0, 10.0, -5.0, 5.0]);
        assert_eq!(from_legacy(&bytes, &f).unwrap(), shape);
    }

    #[test]
    fn test_point_and_circle() {
        let f = GeometryFactory::geodetic();
        let point: Shape = f.point(3.0, 4.0).unwrap().into();
        let bytes = to_legacy(&point).unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(from_legacy(&bytes, &f).unwrap(), point);

        let circle: Shape = f.circle(3.0, 4.0, 500.0).unwrap().into();
        let bytes = to_legacy(&circle).unwrap();
        assert_eq!(bytes[0], 3);
        assert_eq!(bytes.len(), 25);
        let Shape::Circle(c) = from_legacy(&bytes, &f).unwrap() else {
            panic!("expected a circle");
        };
        assert_eq!((c.center().x(), c.center().y(), c.radius()), (3.0, 4.0, 500.0));
    }

    #[test]
    fn test_unsupported() {
        let f = GeometryFactory::geodetic();
        let line: Shape = f.line(&[0.0, 1.0], &[0.0, 1.0]).unwrap().into();
        assert!(matches!(to_legacy(&line), Err(GeoShapeError::UnsupportedOperation(_))));
        assert!(matches!(from_legacy(&[0], &f), Err(GeoShapeError::UnsupportedOperation(_))));
        assert!(matches!(from_legacy(&[9], &f), Err(GeoShapeError::InvalidFormat(_))));
        assert_eq!(from_legacy(&[1, 0, 0], &f), Err(GeoShapeError::UnexpectedEof));
    }
}
