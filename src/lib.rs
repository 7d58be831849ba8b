//! Mailnet
//!
//! Statistical report over a directed email-communication graph. Nodes are
//! members of an institution, edges are emails, and every node belongs to one
//! research group.
//!
//! # Pipeline
//!
//! 1. **Graph loader**: edge list + label list, validated into an `EmailGraph`
//! 2. **Descriptive stats**: out-degree distribution and per-group aggregates
//! 3. **Path metrics**: diameter and average shortest-path length
//! 4. **Centrality suite**: betweenness, closeness, eigenvector, PageRank
//! 5. **Community detector**: Louvain on the undirected projection,
//!    cross-tabulated against the true group labels
//!
//! Results are returned as an immutable `AnalysisReport` keyed by node id.
//!
//! ## Disconnected graphs
//!
//! - Diameter and average path length only consider ordered pairs `(u, v)`,
//!   `u != v`, where `v` is reachable from `u`. Without any such pair both
//!   are zero.
//! - Closeness of `u` is `1 / sum(d(u, v))` over reachable `v`; a node that
//!   reaches nobody scores zero.
//!
//! ## Example Usage
//!
//! ```rust
//! use mailnet::graph::{EmailEdge, EmailGraph, GroupLabel};
//! use mailnet::{analyze, ReportConfig};
//!
//! let labels = [(1, GroupLabel::new(1)), (2, GroupLabel::new(1)), (3, GroupLabel::new(1))]
//!     .into_iter()
//!     .collect();
//! let edges = vec![EmailEdge::new(1, 2), EmailEdge::new(2, 3), EmailEdge::new(1, 3)];
//! let graph = EmailGraph::from_parts(labels, edges, 42).unwrap();
//!
//! let report = analyze(&graph, &ReportConfig::default()).unwrap();
//! assert_eq!(report.paths.diameter, 1);
//! assert_eq!(report.paths.average_path_length, 1.0);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
pub mod stats;

pub use analysis::analyze;
pub use config::{ConfigError, ReportConfig};
pub use error::{MailnetError, MailnetResult};
pub use graph::{EmailGraph, GraphError};
pub use report::{AnalysisReport, Measure, NodeScores};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
