//! Centrality algorithms: Betweenness (Brandes), Closeness, Eigenvector.
//!
//! Betweenness and closeness follow outgoing edges of the directed view.
//! Eigenvector centrality is computed on the undirected projection.

use super::common::{GraphView, NodeId, UndirectedView};
use super::pathfinding::bfs_distances;
use ndarray::Array1;
use rayon::prelude::*;
use std::collections::{HashMap, VecDeque};

/// Sources handled per rayon task in Brandes' algorithm
const BETWEENNESS_CHUNK: usize = 64;

/// Betweenness centrality via Brandes' algorithm.
///
/// Unnormalised and directed: for every ordered pair `(s, t)` a node receives
/// the fraction of shortest `s -> t` paths passing through it. Parallel edges
/// count as distinct paths.
pub fn betweenness_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    if n == 0 {
        return HashMap::new();
    }

    let sources: Vec<usize> = (0..n).collect();

    // Partial sums are collected in chunk order and reduced sequentially so
    // the floating-point result does not depend on thread scheduling.
    let partials: Vec<Vec<f64>> = sources
        .par_chunks(BETWEENNESS_CHUNK)
        .map(|chunk| {
            let mut bc = vec![0.0_f64; n];
            let mut state = BrandesState::new(n);
            for &s in chunk {
                state.accumulate(view, s, &mut bc);
            }
            bc
        })
        .collect();

    let mut bc = vec![0.0_f64; n];
    for partial in partials {
        for (total, value) in bc.iter_mut().zip(partial) {
            *total += value;
        }
    }

    view.index_to_node.iter().copied().zip(bc).collect()
}

/// Reusable buffers for a single-source Brandes pass
struct BrandesState {
    stack: Vec<usize>,
    predecessors: Vec<Vec<usize>>,
    sigma: Vec<f64>,
    dist: Vec<i64>,
    delta: Vec<f64>,
    queue: VecDeque<usize>,
}

impl BrandesState {
    fn new(n: usize) -> Self {
        Self {
            stack: Vec::with_capacity(n),
            predecessors: vec![Vec::new(); n],
            sigma: vec![0.0; n],
            dist: vec![-1; n],
            delta: vec![0.0; n],
            queue: VecDeque::with_capacity(n),
        }
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.queue.clear();
        for preds in self.predecessors.iter_mut() {
            preds.clear();
        }
        self.sigma.fill(0.0);
        self.dist.fill(-1);
        self.delta.fill(0.0);
    }

    fn accumulate(&mut self, view: &GraphView, s: usize, bc: &mut [f64]) {
        self.reset();

        self.sigma[s] = 1.0;
        self.dist[s] = 0;
        self.queue.push_back(s);

        // BFS from source, counting shortest paths
        while let Some(v) = self.queue.pop_front() {
            self.stack.push(v);
            for &w in view.successors(v) {
                if self.dist[w] < 0 {
                    self.queue.push_back(w);
                    self.dist[w] = self.dist[v] + 1;
                }
                if self.dist[w] == self.dist[v] + 1 {
                    self.sigma[w] += self.sigma[v];
                    self.predecessors[w].push(v);
                }
            }
        }

        // Back-propagation of dependencies
        while let Some(w) = self.stack.pop() {
            for &v in &self.predecessors[w] {
                self.delta[v] += (self.sigma[v] / self.sigma[w]) * (1.0 + self.delta[w]);
            }
            if w != s {
                bc[w] += self.delta[w];
            }
        }
    }
}

/// Closeness centrality along outgoing edges.
///
/// `1 / sum(d(u, v))` over the nodes `v` reachable from `u`. Unreachable nodes
/// are left out of the sum; a node that reaches nobody scores 0.0.
pub fn closeness_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let scores: Vec<f64> = (0..view.node_count)
        .into_par_iter()
        .map(|s| {
            let total: u64 = bfs_distances(view, s)
                .into_iter()
                .flatten()
                .map(u64::from)
                .sum();
            if total == 0 {
                0.0
            } else {
                1.0 / total as f64
            }
        })
        .collect();

    view.index_to_node.iter().copied().zip(scores).collect()
}

/// Configuration for eigenvector centrality
#[derive(Debug, Clone, Copy)]
pub struct EigenvectorConfig {
    /// Maximum number of power iterations
    pub max_iterations: usize,
    /// Convergence tolerance on the max-scaled vector
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-9,
        }
    }
}

/// Result of eigenvector centrality
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    /// Score per node, scaled so the maximum is 1
    pub scores: HashMap<NodeId, f64>,
    /// Power iterations performed
    pub iterations: usize,
    /// Whether the max change fell below the tolerance
    pub converged: bool,
}

/// Eigenvector centrality on an undirected (symmetrised) adjacency.
///
/// Power iteration on `A + I` starting from the weighted degrees; the shift
/// keeps bipartite graphs from oscillating and leaves the eigenvector
/// unchanged. Scores are rescaled to a maximum of 1 after every step.
/// A graph without edges scores 0.0 everywhere.
pub fn eigenvector_centrality(
    graph: &UndirectedView,
    config: EigenvectorConfig,
) -> EigenvectorResult {
    let n = graph.node_count;

    let mut x: Array1<f64> = (0..n).map(|i| graph.strength(i)).collect();
    let start_max = x.fold(0.0_f64, |acc, &v| acc.max(v));

    if n == 0 || start_max <= 0.0 {
        return EigenvectorResult {
            scores: graph.index_to_node.iter().map(|&id| (id, 0.0)).collect(),
            iterations: 0,
            converged: true,
        };
    }
    x /= start_max;

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        iterations += 1;

        // y = (A + I) x
        let mut y = x.clone();
        for i in 0..n {
            let mut acc = 2.0 * graph.self_loops[i] * x[i];
            for (&j, &w) in graph.neighbors(i).iter().zip(graph.edge_weights(i)) {
                acc += w * x[j];
            }
            y[i] += acc;
        }

        let max = y.fold(0.0_f64, |acc, &v| acc.max(v));
        y /= max;

        let delta = (&y - &x).fold(0.0_f64, |acc, &v| acc.max(v.abs()));
        x = y;

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    EigenvectorResult {
        scores: graph.index_to_node.iter().copied().zip(x.iter().copied()).collect(),
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_betweenness_chain() {
        // 1->2->3: node 2 lies on the single 1->3 path
        let view = GraphView::from_edges(vec![1, 2, 3], &[(0, 1), (1, 2)]);
        let bc = betweenness_centrality(&view);

        assert_eq!(bc[&1], 0.0);
        assert_eq!(bc[&2], 1.0);
        assert_eq!(bc[&3], 0.0);
    }

    #[test]
    fn test_betweenness_split_paths() {
        // 1->2->4, 1->3->4: two shortest 1->4 paths share the credit
        let view = GraphView::from_edges(vec![1, 2, 3, 4], &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let bc = betweenness_centrality(&view);

        assert!((bc[&2] - 0.5).abs() < 1e-12);
        assert!((bc[&3] - 0.5).abs() < 1e-12);
        assert_eq!(bc[&1], 0.0);
    }

    #[test]
    fn test_betweenness_parallel_edges_weight_paths() {
        // 1=>2->4 (two parallel edges), 1->3->4
        let view = GraphView::from_edges(
            vec![1, 2, 3, 4],
            &[(0, 1), (0, 1), (0, 2), (1, 3), (2, 3)],
        );
        let bc = betweenness_centrality(&view);

        assert!((bc[&2] - 2.0 / 3.0).abs() < 1e-12);
        assert!((bc[&3] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_betweenness_deterministic_across_chunks() {
        // Ring large enough to span several chunks
        let n = 3 * BETWEENNESS_CHUNK + 5;
        let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        let view = GraphView::from_edges((0..n as u64).collect(), &edges);

        let first = betweenness_centrality(&view);
        let second = betweenness_centrality(&view);
        for (id, score) in &first {
            assert_eq!(score.to_bits(), second[id].to_bits());
        }
        // Every node of a directed ring carries the same load
        let expected = ((n - 1) * (n - 2) / 2) as f64;
        assert!((first[&0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_closeness() {
        // 1->2->3, 4 isolated
        let view = GraphView::from_edges(vec![1, 2, 3, 4], &[(0, 1), (1, 2)]);
        let cc = closeness_centrality(&view);

        assert!((cc[&1] - 1.0 / 3.0).abs() < 1e-12);
        assert!((cc[&2] - 1.0).abs() < 1e-12);
        assert_eq!(cc[&3], 0.0);
        assert_eq!(cc[&4], 0.0);
    }

    #[test]
    fn test_eigenvector_star() {
        // Undirected star: center 0, leaves 1..=3
        let und = UndirectedView::from_weighted_edges(
            vec![0, 1, 2, 3],
            &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)],
        );
        let result = eigenvector_centrality(&und, EigenvectorConfig::default());

        assert!(result.converged);
        assert!((result.scores[&0] - 1.0).abs() < 1e-9);
        // Leaves score 1/sqrt(3) relative to the center
        let leaf = 1.0 / 3.0_f64.sqrt();
        for id in 1..=3 {
            assert!((result.scores[&id] - leaf).abs() < 1e-6);
        }
    }

    #[test]
    fn test_eigenvector_no_edges() {
        let und = UndirectedView::from_weighted_edges(vec![5, 6], &[]);
        let result = eigenvector_centrality(&und, EigenvectorConfig::default());

        assert_eq!(result.scores[&5], 0.0);
        assert_eq!(result.scores[&6], 0.0);
    }
}
