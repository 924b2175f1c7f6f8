pub mod graph;
pub mod traversal;

pub use graph::{build_indices, FamilyGraph, GraphStatistics, Indices};
pub use traversal::{AncestorDistances, AncestryTraversal, CommonAncestor};
