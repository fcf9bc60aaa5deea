//! Error types for the geoshape kernel.

use thiserror::Error;

/// Errors raised by shape construction, relation queries and the codecs.
///
/// Every error is synchronous and local: nothing here is transient, so
/// callers reject the offending input instead of retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoShapeError {
    /// Malformed construction input: short or mismatched coordinate arrays,
    /// an unclosed polygon ring, nested holes.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A coordinate outside the coordinate reference system's world bounds.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The operation is not defined for this shape or shape pair.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid geohash: {0}")]
    InvalidGeohash(String),

    /// Malformed binary or text encoding.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No spatial operation is registered under the name or alias.
    #[error("Spatial operation [{0}] not found")]
    UnknownOperation(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoShapeError>;
