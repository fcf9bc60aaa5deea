//! Compatibility encodings for shapes.
//!
//! - [`wkb`]: varint-headed well-known binary, every shape kind.
//! - [`legacy`]: fixed-layout records for points, rectangles and circles.
//! - [`wkt`]: well-known text, write only.
//!
//! Readers build shapes through a [`GeometryFactory`](crate::shape::GeometryFactory),
//! so decoded shapes are validated like any other.

pub mod legacy;
pub mod wkb;
pub mod wkt;

use bytes::{Buf, BufMut};

use crate::error::{GeoShapeError, Result};

/// Unsigned LEB128, seven bits per byte, low bits first.
pub(crate) fn put_varint(buf: &mut impl BufMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub(crate) fn get_varint(buf: &mut impl Buf) -> Result<u64> {
    let mut value = 0u64;
    for shift in (0..64).step_by(7) {
        if !buf.has_remaining() {
            return Err(GeoShapeError::UnexpectedEof);
        }
        let b = buf.get_u8();
        value |= u64::from(b & 0x7f) << shift;
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(GeoShapeError::InvalidFormat("varint longer than 10 bytes".to_string()))
}

/// A varint that must fit in `u32`, used for counts and ordinals.
pub(crate) fn get_varint_u32(buf: &mut impl Buf) -> Result<u32> {
    let v = get_varint(buf)?;
    u32::try_from(v).map_err(|_| GeoShapeError::InvalidFormat(format!("varint {} out of range", v)))
}

pub(crate) fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(GeoShapeError::UnexpectedEof);
    }
    Ok(())
}
