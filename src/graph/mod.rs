//! Email graph model and loader
//!
//! Nodes are institution members identified by integer ids, each labelled with
//! a research group. Edges are emails; parallel edges and self-loops are kept.

pub mod loader;
pub mod store;
pub mod types;

pub use loader::{load_edges, load_labels};
pub use store::{EmailGraph, GraphError, GraphResult};
pub use types::{EmailEdge, GroupLabel, NodeId, DEFAULT_GROUP_COUNT};
