//! Immutable in-memory email graph
//!
//! Built once from the label list and the edge list; every derived value is
//! computed elsewhere and returned in a separate results structure.

use super::loader::{load_edges, load_labels};
use super::types::{EmailEdge, GroupLabel, NodeId};
use indexmap::IndexMap;
use mailnet_algorithms::{GraphView, UndirectedView};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading or validating the graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{file}:{line}: group index {index} out of range (expected 0..{group_count})")]
    LabelOutOfRange {
        file: String,
        line: usize,
        index: u64,
        group_count: u16,
    },

    #[error("{file}:{line}: node {node} already declared on line {first_line}")]
    DuplicateNode {
        file: String,
        line: usize,
        node: NodeId,
        first_line: usize,
    },

    #[error("Node {node} has group label {label} outside 1..={group_count}")]
    InvalidLabel {
        node: NodeId,
        label: GroupLabel,
        group_count: u16,
    },

    #[error("Edge on line {line} references unlabeled node {node}")]
    UnlabeledNode { node: NodeId, line: usize },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Directed email multigraph with a group label per node
#[derive(Debug, Clone)]
pub struct EmailGraph {
    /// Node -> group, in declaration order
    labels: IndexMap<NodeId, GroupLabel>,
    /// Emails in input order
    edges: Vec<EmailEdge>,
    /// Dense CSR topology; index order matches `labels`
    view: GraphView,
    /// Size of the group enumeration
    group_count: u16,
}

impl EmailGraph {
    /// Build the graph, checking that every label is in `1..=group_count`
    /// and every edge endpoint is labelled.
    pub fn from_parts(
        labels: IndexMap<NodeId, GroupLabel>,
        edges: Vec<EmailEdge>,
        group_count: u16,
    ) -> GraphResult<Self> {
        if let Some((&node, &label)) = labels
            .iter()
            .find(|(_, label)| !(1..=group_count).contains(&label.get()))
        {
            return Err(GraphError::InvalidLabel {
                node,
                label,
                group_count,
            });
        }

        let mut dense = Vec::with_capacity(edges.len());
        for edge in &edges {
            let from = labels.get_index_of(&edge.from).ok_or(GraphError::UnlabeledNode {
                node: edge.from,
                line: edge.line,
            })?;
            let to = labels.get_index_of(&edge.to).ok_or(GraphError::UnlabeledNode {
                node: edge.to,
                line: edge.line,
            })?;
            dense.push((from, to));
        }

        let view = GraphView::from_edges(labels.keys().copied().collect(), &dense);

        Ok(EmailGraph {
            labels,
            edges,
            view,
            group_count,
        })
    }

    /// Load the edge list and label list from disk.
    pub fn load(
        edges_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
        group_count: u16,
    ) -> GraphResult<Self> {
        let labels_path = labels_path.as_ref();
        let edges_path = edges_path.as_ref();

        let labels = load_labels(
            BufReader::new(open(labels_path)?),
            &labels_path.display().to_string(),
            group_count,
        )?;
        let edges = load_edges(
            BufReader::new(open(edges_path)?),
            &edges_path.display().to_string(),
        )?;

        let graph = Self::from_parts(labels, edges, group_count)?;
        info!(
            "Loaded email graph: {} nodes, {} edges, {} groups",
            graph.node_count(),
            graph.edge_count(),
            graph.groups_present()
        );
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of emails, parallel edges included
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node ids in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.labels.keys().copied()
    }

    pub fn label(&self, node: NodeId) -> Option<GroupLabel> {
        self.labels.get(&node).copied()
    }

    pub fn labels(&self) -> &IndexMap<NodeId, GroupLabel> {
        &self.labels
    }

    pub fn edges(&self) -> &[EmailEdge] {
        &self.edges
    }

    pub fn group_count(&self) -> u16 {
        self.group_count
    }

    /// Number of distinct groups with at least one member
    pub fn groups_present(&self) -> usize {
        self.labels.values().collect::<HashSet<_>>().len()
    }

    /// Directed CSR view for algorithm execution
    pub fn view(&self) -> &GraphView {
        &self.view
    }

    /// Undirected projection: direction dropped, parallel edges merged,
    /// self-loops removed.
    pub fn undirected_projection(&self) -> UndirectedView {
        UndirectedView::from_directed(&self.view)
    }
}

fn open(path: &Path) -> GraphResult<File> {
    File::open(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entries: &[(NodeId, u16)]) -> IndexMap<NodeId, GroupLabel> {
        entries
            .iter()
            .map(|&(node, group)| (node, GroupLabel::new(group)))
            .collect()
    }

    #[test]
    fn test_from_parts_builds_view() {
        let graph = EmailGraph::from_parts(
            labels(&[(1, 1), (2, 1), (3, 2)]),
            vec![EmailEdge::new(1, 2), EmailEdge::new(2, 3), EmailEdge::new(1, 3)],
            42,
        )
        .unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.groups_present(), 2);
        assert_eq!(graph.label(3), Some(GroupLabel::new(2)));
        assert_eq!(graph.label(9), None);

        let view = graph.view();
        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.out_degree(2), 0);
        assert_eq!(view.index_to_node, vec![1, 2, 3]);
    }

    #[test]
    fn test_unlabeled_endpoint_rejected() {
        let edges = vec![EmailEdge { from: 1, to: 5, line: 4 }];
        let err = EmailGraph::from_parts(labels(&[(1, 1)]), edges, 42).unwrap_err();

        assert!(matches!(err, GraphError::UnlabeledNode { node: 5, line: 4 }));
        assert_eq!(err.to_string(), "Edge on line 4 references unlabeled node 5");
    }

    #[test]
    fn test_label_outside_group_range_rejected() {
        let edges = vec![EmailEdge::new(1, 2)];

        let err = EmailGraph::from_parts(labels(&[(1, 1), (2, 0)]), edges.clone(), 42).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLabel { node: 2, group_count: 42, .. }));

        let err = EmailGraph::from_parts(labels(&[(1, 43), (2, 1)]), edges.clone(), 42).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLabel { node: 1, group_count: 42, .. }));
        assert_eq!(err.to_string(), "Node 1 has group label 43 outside 1..=42");

        assert!(EmailGraph::from_parts(labels(&[(1, 1), (2, 42)]), edges, 42).is_ok());
    }

    #[test]
    fn test_projection_merges_reciprocal_emails() {
        let graph = EmailGraph::from_parts(
            labels(&[(1, 1), (2, 1)]),
            vec![EmailEdge::new(1, 2), EmailEdge::new(2, 1), EmailEdge::new(1, 1)],
            42,
        )
        .unwrap();

        let und = graph.undirected_projection();
        assert_eq!(und.total_weight(), 1.0);
        assert_eq!(graph.view().edge_count(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = EmailGraph::load("/nonexistent/edges.txt", "/nonexistent/labels.txt", 42)
            .unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }
}
