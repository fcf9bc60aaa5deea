//! Compute layer: geometric algorithms and acceleration structures.
//!
//! - Distance metrics and circle geometry
//! - Edge trees over polygon and line boundaries
//! - Quantized grid predicates for point-in-shape tests
//! - Construction-time validation

pub mod spatial;
pub mod validation;
