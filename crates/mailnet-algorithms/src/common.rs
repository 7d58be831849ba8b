//! Shared utilities for graph algorithms
//!
//! Provides read-only, optimized views of the graph topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of a directed multigraph using Compressed Sparse Row (CSR) format.
///
/// Parallel edges appear as repeated entries in `out_targets` / `in_sources`.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,
}

impl GraphView {
    /// Build a view from node ids and index-based edges.
    ///
    /// Edge order is preserved inside each adjacency row.
    pub fn from_edges(index_to_node: Vec<NodeId>, edges: &[(usize, usize)]) -> Self {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for &(u, v) in edges {
            outgoing[u].push(v);
            incoming[v].push(u);
        }

        Self::from_adjacency_list(node_count, index_to_node, node_to_index, outgoing, incoming)
    }

    /// Number of edges, counting parallel edges separately
    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Helper to create GraphView from adjacency lists
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();

        out_offsets.push(0);
        for neighbors in outgoing {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
        }
    }
}

/// Weighted undirected adjacency in CSR form.
///
/// Every edge `{u, v}` with `u != v` is stored in both rows. Self-loops are kept
/// separately in `self_loops` so aggregated graphs can carry internal weight.
#[derive(Debug, Clone)]
pub struct UndirectedView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Offsets into `neighbors` / `weights`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices, sorted per row
    pub neighbors: Vec<usize>,
    /// Edge weights aligned with `neighbors`
    pub weights: Vec<f64>,
    /// Self-loop weight per node
    pub self_loops: Vec<f64>,
}

impl UndirectedView {
    /// Project a directed view: direction discarded, parallel edges merged into
    /// a single edge of weight 1, self-loops dropped.
    pub fn from_directed(view: &GraphView) -> Self {
        let mut edges = Vec::with_capacity(view.edge_count());
        for u in 0..view.node_count {
            for &v in view.successors(u) {
                if u != v {
                    edges.push((u.min(v), u.max(v)));
                }
            }
        }
        edges.sort_unstable();
        edges.dedup();

        let weighted: Vec<(usize, usize, f64)> =
            edges.into_iter().map(|(u, v)| (u, v, 1.0)).collect();
        Self::from_weighted_edges(view.index_to_node.clone(), &weighted)
    }

    /// Build from weighted edges. Repeated pairs accumulate their weight;
    /// `(u, u, w)` adds `w` to the self-loop of `u`.
    pub fn from_weighted_edges(index_to_node: Vec<NodeId>, edges: &[(usize, usize, f64)]) -> Self {
        let node_count = index_to_node.len();
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        let mut self_loops = vec![0.0; node_count];

        for &(u, v, w) in edges {
            if u == v {
                self_loops[u] += w;
            } else {
                rows[u].push((v, w));
                rows[v].push((u, w));
            }
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut neighbors = Vec::new();
        let mut weights = Vec::new();
        offsets.push(0);

        for mut row in rows {
            row.sort_by_key(|&(v, _)| v);
            let mut last: Option<usize> = None;
            for (v, w) in row {
                if last == Some(v) {
                    if let Some(acc) = weights.last_mut() {
                        *acc += w;
                    }
                } else {
                    neighbors.push(v);
                    weights.push(w);
                    last = Some(v);
                }
            }
            offsets.push(neighbors.len());
        }

        UndirectedView {
            node_count,
            index_to_node,
            offsets,
            neighbors,
            weights,
            self_loops,
        }
    }

    /// Neighbors of a node, excluding itself
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbors[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weights aligned with `neighbors(idx)`
    pub fn edge_weights(&self, idx: usize) -> &[f64] {
        &self.weights[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weighted degree. A self-loop contributes twice its weight.
    pub fn strength(&self, idx: usize) -> f64 {
        self.edge_weights(idx).iter().sum::<f64>() + 2.0 * self.self_loops[idx]
    }

    /// Total edge weight `m` (each undirected edge counted once)
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum::<f64>() / 2.0 + self.self_loops.iter().sum::<f64>()
    }
}
