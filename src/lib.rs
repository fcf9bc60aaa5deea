//! Geometric kernel for spatial search: shapes and their relations to
//! rectangles, edge trees, quantized point-in-shape grids and spatial
//! prefix trees.
//!
//! ```rust
//! use geoshape::{GeometryFactory, Relation, Shape, SpatialOperation};
//!
//! let factory = GeometryFactory::geodetic();
//! let square: Shape = factory
//!     .polygon(&[0.0, 10.0, 10.0, 0.0, 0.0], &[0.0, 0.0, 10.0, 10.0, 0.0], vec![])?
//!     .into();
//! let inner = factory.rectangle(2.0, 3.0, 2.0, 3.0)?;
//! assert_eq!(square.relate_box(&inner), Relation::Contains);
//!
//! let query: Shape = factory.rectangle(-5.0, 20.0, -5.0, 20.0)?.into();
//! assert!(SpatialOperation::for_name("CoveredBy")?.evaluate(&square, &query)?);
//! # Ok::<(), geoshape::GeoShapeError>(())
//! ```

pub mod codec;
pub mod compute;
pub mod config;
pub mod encoding;
pub mod error;
pub mod operation;
pub mod prefix;
pub mod shape;

pub use config::{Config, PrefixTreeKind};
pub use encoding::CoordinateEncoder;
pub use error::{GeoShapeError, Result};

pub use geoshape_types::Relation;
pub use geoshape_types::crs::CoordinateSystemConfig;

pub use compute::spatial::{DistanceMetric, EdgeTree, GridPredicate, distance_between};

pub use operation::{SpatialArgs, SpatialOperation, calc_distance_from_err_pct};

pub use prefix::{
    Cell, CellMatch, CellToken, CoveringCells, GeohashPrefixTree, QuadPrefixTree,
    SpatialPrefixTree,
};

pub use shape::{
    Circle, GeometryFactory, Line, MultiLine, MultiPoint, MultiPolygon, Point, Polygon,
    Rectangle, Shape, ShapeCollection, ShapeType,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{GeoShapeError, Result};

    pub use crate::{Relation, Shape, ShapeType};

    pub use crate::{GeometryFactory, Rectangle};

    pub use crate::{SpatialArgs, SpatialOperation};

    pub use crate::{Config, CoordinateSystemConfig, DistanceMetric, PrefixTreeKind};

    pub use crate::{Cell, GeohashPrefixTree, QuadPrefixTree, SpatialPrefixTree};
}
