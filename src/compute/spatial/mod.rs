pub mod algorithms;
pub use algorithms::{DistanceMetric, distance_between};

pub mod edge_tree;
pub use edge_tree::{EdgeTree, RingRef};

pub mod predicate;
pub use predicate::GridPredicate;
