//! PageRank algorithm implementation
//!
//! Stationary distribution of a damped random walk along outgoing edges.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// PageRank configuration
#[derive(Debug, Clone, Copy)]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Maximum number of iterations
    pub iterations: usize,
    /// Stop once the L1 change between iterations drops below this
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            iterations: 1000,
            tolerance: 1e-10,
        }
    }
}

/// PageRank scores plus convergence information
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Score per node; scores sum to 1
    pub scores: HashMap<NodeId, f64>,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the L1 change fell below the tolerance
    pub converged: bool,
}

/// Calculate PageRank for the graph view
///
/// Scores start at `1/n`. Nodes without outgoing edges spread their mass
/// uniformly over all nodes, so the scores always sum to 1. Parallel edges
/// weight the transition proportionally.
pub fn page_rank(view: &GraphView, config: PageRankConfig) -> PageRankResult {
    let n = view.node_count;

    if n == 0 {
        return PageRankResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let nf = n as f64;
    let mut scores = vec![1.0 / nf; n];
    let mut next_scores = vec![0.0; n];

    let d = config.damping_factor;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.iterations {
        iterations += 1;

        let dangling: f64 = (0..n)
            .filter(|&i| view.out_degree(i) == 0)
            .map(|i| scores[i])
            .sum();
        let base_score = (1.0 - d) / nf + d * dangling / nf;

        let mut total_diff = 0.0;
        for i in 0..n {
            let mut sum_incoming = 0.0;

            // Iterate over incoming edges
            for &source_idx in view.predecessors(i) {
                sum_incoming += scores[source_idx] / view.out_degree(source_idx) as f64;
            }

            next_scores[i] = base_score + d * sum_incoming;
            total_diff += (next_scores[i] - scores[i]).abs();
        }

        // Swap buffers
        std::mem::swap(&mut scores, &mut next_scores);

        if total_diff < config.tolerance {
            converged = true;
            break;
        }
    }

    let scores = scores
        .into_iter()
        .enumerate()
        .map(|(idx, score)| (view.index_to_node[idx], score))
        .collect();

    PageRankResult {
        scores,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(result: &PageRankResult) -> f64 {
        result.scores.values().sum()
    }

    #[test]
    fn test_star_center_ranks_highest() {
        // Center (1) <-> 2, 3
        let view = GraphView::from_edges(vec![1, 2, 3], &[(0, 1), (0, 2), (1, 0), (2, 0)]);
        let result = page_rank(&view, PageRankConfig::default());

        assert!(result.converged);
        assert!((total(&result) - 1.0).abs() < 1e-9);
        assert!(result.scores[&1] > result.scores[&2]);
        assert!((result.scores[&2] - result.scores[&3]).abs() < 1e-12);
    }

    #[test]
    fn test_dangling_nodes_keep_mass() {
        // 1 -> 2, 2 has no outgoing edges
        let view = GraphView::from_edges(vec![1, 2, 3], &[(0, 1)]);
        let result = page_rank(&view, PageRankConfig::default());

        assert!((total(&result) - 1.0).abs() < 1e-9);
        assert!(result.scores.values().all(|&s| s > 0.0));
        assert!(result.scores[&2] > result.scores[&1]);
    }

    #[test]
    fn test_no_edges_is_uniform() {
        let view = GraphView::from_edges(vec![7, 8, 9, 10], &[]);
        let result = page_rank(&view, PageRankConfig::default());

        for score in result.scores.values() {
            assert!((score - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_graph() {
        let view = GraphView::from_edges(vec![], &[]);
        let result = page_rank(&view, PageRankConfig::default());
        assert!(result.scores.is_empty());
    }
}
