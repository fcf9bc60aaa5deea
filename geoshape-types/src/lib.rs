//! # geoshape-types
//!
//! Plain data types shared by every layer of the geoshape kernel.
//!
//! - **Relation**: the five-valued answer to "how does shape A relate to B"
//! - **CoordinateSystemConfig**: world bounds and wraparound of a coordinate
//!   reference system
//!
//! Both types are `Copy`, serializable with Serde and free of any geometry
//! logic, so they can travel through configuration files and query plans.
//!
//! ## Examples
//!
//! ```rust
//! use geoshape_types::relation::Relation;
//! use geoshape_types::crs::CoordinateSystemConfig;
//!
//! assert_eq!(Relation::Contains.transpose(), Relation::Within);
//!
//! let crs = CoordinateSystemConfig::geodetic();
//! assert!(crs.wraps_longitude);
//! ```

pub mod crs;
pub mod relation;

pub use crs::CoordinateSystemConfig;
pub use relation::Relation;
