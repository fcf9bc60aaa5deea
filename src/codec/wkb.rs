//! Well-known binary with varint headers.
//!
//! Every geometry starts with a varint byte-order marker (0 big-endian,
//! 1 little-endian) and a varint [`ShapeType`] ordinal. Coordinates are
//! raw 8-byte IEEE 754 values in the marked byte order. Counts are
//! varints. Line strings inside polygons carry no header; elements of
//! multi-geometries and collections each carry their own.
//!
//! Content per type:
//!
//! | type | content |
//! |------|---------|
//! | point | x, y |
//! | line string | count, points |
//! | polygon | ring count, shell ring, hole rings |
//! | multi-* / collection | count, headered elements |
//! | envelope | min x, max x, max y, min y |
//! | circle | center y, center x, radius |

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{ensure_remaining, get_varint_u32, put_varint};
use crate::error::{GeoShapeError, Result};
use crate::shape::{GeometryFactory, Line, MultiPoint, Polygon, Shape, ShapeType};

/// Byte-order marker values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Big-endian.
    Xdr = 0,
    /// Little-endian.
    Ndr = 1,
}

/// Encodes `shape` in big-endian order.
pub fn to_wkb(shape: &Shape) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(estimate_len(shape));
    write_wkb(shape, &mut buf)?;
    Ok(buf.freeze())
}

/// Appends the encoding of `shape` to `buf`.
///
/// Circles nested in a collection are rejected; a circle on its own is
/// fine.
pub fn write_wkb(shape: &Shape, buf: &mut impl BufMut) -> Result<()> {
    write_header(buf, shape.shape_type());
    match shape {
        Shape::Point(p) => put_xy(buf, p.x(), p.y()),
        Shape::MultiPoint(mp) => {
            put_varint(buf, mp.len() as u64);
            for p in mp.points() {
                write_header(buf, ShapeType::Point);
                put_xy(buf, p.x(), p.y());
            }
        }
        Shape::Line(l) => put_line(buf, l.points()),
        Shape::MultiLine(ml) => {
            put_varint(buf, ml.lines().len() as u64);
            for l in ml.lines() {
                write_header(buf, ShapeType::LineString);
                put_line(buf, l.points());
            }
        }
        Shape::Polygon(p) => put_polygon(buf, p),
        Shape::MultiPolygon(mp) => {
            put_varint(buf, mp.polygons().len() as u64);
            for p in mp.polygons() {
                write_header(buf, ShapeType::Polygon);
                put_polygon(buf, p);
            }
        }
        Shape::Rectangle(r) => {
            buf.put_f64(r.left());
            buf.put_f64(r.right());
            buf.put_f64(r.top());
            buf.put_f64(r.bottom());
        }
        Shape::Circle(c) => {
            buf.put_f64(c.center().y());
            buf.put_f64(c.center().x());
            buf.put_f64(c.radius());
        }
        Shape::Collection(col) => {
            if col.shapes().iter().any(|s| matches!(s, Shape::Circle(_))) {
                return Err(GeoShapeError::UnsupportedOperation(
                    "circles inside a GEOMETRYCOLLECTION have no binary encoding".to_string(),
                ));
            }
            put_varint(buf, col.len() as u64);
            for s in col.shapes() {
                write_wkb(s, buf)?;
            }
        }
    }
    Ok(())
}

fn write_header(buf: &mut impl BufMut, shape_type: ShapeType) {
    put_varint(buf, ByteOrder::Xdr as u64);
    put_varint(buf, u64::from(shape_type.wkb_ordinal()));
}

fn put_xy(buf: &mut impl BufMut, x: f64, y: f64) {
    buf.put_f64(x);
    buf.put_f64(y);
}

fn put_line(buf: &mut impl BufMut, points: &MultiPoint) {
    put_varint(buf, points.len() as u64);
    for (x, y) in points.xs().iter().zip(points.ys()) {
        put_xy(buf, *x, *y);
    }
}

fn put_polygon(buf: &mut impl BufMut, polygon: &Polygon) {
    put_varint(buf, polygon.holes().len() as u64 + 1);
    put_line(buf, polygon.shell());
    for hole in polygon.holes() {
        put_line(buf, hole.shell());
    }
}

fn estimate_len(shape: &Shape) -> usize {
    let coords = match shape {
        Shape::Point(_) => 1,
        Shape::MultiPoint(mp) => mp.len(),
        Shape::Line(l) => l.points().len(),
        Shape::MultiLine(ml) => ml.lines().iter().map(|l| l.points().len()).sum(),
        Shape::Polygon(p) => p.shell().len() + p.holes().iter().map(|h| h.shell().len()).sum::<usize>(),
        Shape::MultiPolygon(mp) => mp.polygons().iter().map(|p| p.shell().len()).sum(),
        Shape::Rectangle(_) | Shape::Circle(_) => 2,
        Shape::Collection(c) => c.len() * 4,
    };
    2 + coords * 16
}

/// Deepest collection nesting the reader accepts.
pub const MAX_NESTING: usize = 64;

/// Decodes one geometry from the front of `buf`, advancing it.
pub fn read_wkb(buf: &mut impl Buf, factory: &GeometryFactory) -> Result<Shape> {
    read_nested(buf, factory, 0)
}

fn read_nested(buf: &mut impl Buf, factory: &GeometryFactory, depth: usize) -> Result<Shape> {
    if depth > MAX_NESTING {
        return Err(GeoShapeError::InvalidFormat(format!(
            "collections nested deeper than {}",
            MAX_NESTING
        )));
    }
    let (order, shape_type) = read_header(buf)?;
    let mut reader = Reader {
        buf,
        order,
        factory,
        depth,
    };
    reader.read_content(shape_type)
}

/// Decodes a complete buffer; trailing bytes are an error.
pub fn from_wkb(bytes: &[u8], factory: &GeometryFactory) -> Result<Shape> {
    let mut slice = bytes;
    let shape = read_wkb(&mut slice, factory)?;
    if !slice.is_empty() {
        return Err(GeoShapeError::InvalidFormat(format!(
            "{} trailing bytes after geometry",
            slice.len()
        )));
    }
    Ok(shape)
}

fn read_header(buf: &mut impl Buf) -> Result<(ByteOrder, ShapeType)> {
    let order = match get_varint_u32(buf)? {
        0 => ByteOrder::Xdr,
        1 => ByteOrder::Ndr,
        other => {
            return Err(GeoShapeError::InvalidFormat(format!(
                "unknown byte order {}",
                other
            )));
        }
    };
    let ordinal = get_varint_u32(buf)?;
    let shape_type = ShapeType::from_wkb_ordinal(ordinal).ok_or_else(|| {
        GeoShapeError::InvalidFormat(format!("unknown shape type ordinal {}", ordinal))
    })?;
    Ok((order, shape_type))
}

struct Reader<'a, B> {
    buf: &'a mut B,
    order: ByteOrder,
    factory: &'a GeometryFactory,
    depth: usize,
}

impl<B: Buf> Reader<'_, B> {
    fn f64(&mut self) -> Result<f64> {
        ensure_remaining(&*self.buf, 8)?;
        Ok(match self.order {
            ByteOrder::Xdr => self.buf.get_f64(),
            ByteOrder::Ndr => self.buf.get_f64_le(),
        })
    }

    /// An element count, bounded by what the remaining input could hold.
    fn count(&mut self, min_element_len: usize) -> Result<usize> {
        let n = get_varint_u32(self.buf)? as usize;
        if n.saturating_mul(min_element_len) > self.buf.remaining() {
            return Err(GeoShapeError::UnexpectedEof);
        }
        Ok(n)
    }

    fn coords(&mut self) -> Result<(Vec<f64>, Vec<f64>)> {
        let n = self.count(16)?;
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for _ in 0..n {
            xs.push(self.f64()?);
            ys.push(self.f64()?);
        }
        Ok((xs, ys))
    }

    fn expect_header(&mut self, expected: ShapeType) -> Result<()> {
        let (order, shape_type) = read_header(self.buf)?;
        if shape_type != expected {
            return Err(GeoShapeError::InvalidFormat(format!(
                "expected {} element, found {}",
                expected, shape_type
            )));
        }
        self.order = order;
        Ok(())
    }

    fn line(&mut self) -> Result<Line> {
        let (xs, ys) = self.coords()?;
        self.factory.line(&xs, &ys)
    }

    fn polygon(&mut self) -> Result<Polygon> {
        let rings = self.count(1)?;
        if rings == 0 {
            return Err(GeoShapeError::InvalidFormat(
                "polygon without a shell ring".to_string(),
            ));
        }
        let (xs, ys) = self.coords()?;
        let mut holes = Vec::with_capacity(rings - 1);
        for _ in 1..rings {
            let (hx, hy) = self.coords()?;
            holes.push(self.factory.polygon(&hx, &hy, Vec::new())?);
        }
        self.factory.polygon(&xs, &ys, holes)
    }

    fn read_content(&mut self, shape_type: ShapeType) -> Result<Shape> {
        let shape = match shape_type {
            ShapeType::Point => {
                let x = self.f64()?;
                let y = self.f64()?;
                self.factory.point(x, y)?.into()
            }
            ShapeType::LineString => self.line()?.into(),
            ShapeType::Polygon => self.polygon()?.into(),
            ShapeType::MultiPoint => {
                let n = self.count(18)?;
                let mut xs = Vec::with_capacity(n);
                let mut ys = Vec::with_capacity(n);
                for _ in 0..n {
                    self.expect_header(ShapeType::Point)?;
                    xs.push(self.f64()?);
                    ys.push(self.f64()?);
                }
                self.factory.multi_point(&xs, &ys)?.into()
            }
            ShapeType::MultiLineString => {
                let n = self.count(3)?;
                let mut lines = Vec::with_capacity(n);
                for _ in 0..n {
                    self.expect_header(ShapeType::LineString)?;
                    lines.push(self.line()?);
                }
                self.factory.multi_line(lines)?.into()
            }
            ShapeType::MultiPolygon => {
                let n = self.count(3)?;
                let mut polygons = Vec::with_capacity(n);
                for _ in 0..n {
                    self.expect_header(ShapeType::Polygon)?;
                    polygons.push(self.polygon()?);
                }
                self.factory.multi_polygon(polygons)?.into()
            }
            ShapeType::GeometryCollection => {
                let n = self.count(2)?;
                let mut shapes = Vec::with_capacity(n);
                for _ in 0..n {
                    shapes.push(read_nested(self.buf, self.factory, self.depth + 1)?);
                }
                self.factory.collection(shapes)?.into()
            }
            ShapeType::Envelope => {
                let min_x = self.f64()?;
                let max_x = self.f64()?;
                let max_y = self.f64()?;
                let min_y = self.f64()?;
                self.factory.rectangle(min_x, max_x, min_y, max_y)?.into()
            }
            ShapeType::Circle => {
                let y = self.f64()?;
                let x = self.f64()?;
                let radius = self.f64()?;
                self.factory.circle(x, y, radius)?.into()
            }
        };
        Ok(shape)
    }
}
