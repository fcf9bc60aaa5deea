//! Well-known text output.
//!
//! Coordinates print as `x y` using the shortest representation that reads
//! back to the same double. Rectangles print as
//! `ENVELOPE(min x, max x, max y, min y)`. Circles have no text form.

use std::fmt::Write;

use crate::error::{GeoShapeError, Result};
use crate::shape::{MultiPoint, Polygon, Shape};

pub fn to_wkt(shape: &Shape) -> Result<String> {
    let mut out = String::new();
    write_shape(&mut out, shape)?;
    Ok(out)
}

fn write_shape(out: &mut String, shape: &Shape) -> Result<()> {
    out.push_str(shape.shape_type().wkt_name());
    match shape {
        Shape::Point(p) => {
            let _ = write!(out, "({} {})", p.x(), p.y());
        }
        Shape::MultiPoint(mp) => {
            out.push('(');
            for (i, p) in mp.points().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "({} {})", p.x(), p.y());
            }
            out.push(')');
        }
        Shape::Line(l) => write_coords(out, l.points()),
        Shape::MultiLine(ml) => {
            out.push('(');
            for (i, l) in ml.lines().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_coords(out, l.points());
            }
            out.push(')');
        }
        Shape::Polygon(p) => write_polygon(out, p),
        Shape::MultiPolygon(mp) => {
            out.push('(');
            for (i, p) in mp.polygons().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_polygon(out, p);
            }
            out.push(')');
        }
        Shape::Rectangle(r) => {
            let _ = write!(out, "({}, {}, {}, {})", r.left(), r.right(), r.top(), r.bottom());
        }
        Shape::Circle(_) => {
            return Err(GeoShapeError::UnsupportedOperation(
                "CIRCLE has no well-known text representation".to_string(),
            ));
        }
        Shape::Collection(col) => {
            out.push('(');
            for (i, s) in col.shapes().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_shape(out, s)?;
            }
            out.push(')');
        }
    }
    Ok(())
}

fn write_coords(out: &mut String, points: &MultiPoint) {
    out.push('(');
    for (i, (x, y)) in points.xs().iter().zip(points.ys()).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{} {}", x, y);
    }
    out.push(')');
}

fn write_polygon(out: &mut String, polygon: &Polygon) {
    out.push('(');
    write_coords(out, polygon.shell());
    for hole in polygon.holes() {
        out.push_str(", ");
        write_coords(out, hole.shell());
    }
    out.push(')');
}
