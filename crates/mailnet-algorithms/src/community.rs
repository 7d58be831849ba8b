//! Community detection algorithms
//!
//! Louvain modularity optimisation on an undirected weighted view, and
//! Weakly Connected Components on the directed view.

use super::common::{GraphView, NodeId, UndirectedView};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

// ── Louvain ──────────────────────────────────────────────────────────────────

/// Configuration for Louvain community detection
#[derive(Debug, Clone, Copy)]
pub struct LouvainConfig {
    /// Resolution parameter. Higher values favour smaller communities.
    pub resolution: f64,
    /// Upper bound on local-moving passes per level
    pub max_passes: usize,
    /// Upper bound on aggregation levels
    pub max_levels: usize,
    /// Minimum modularity gain for another level to be attempted
    pub tolerance: f64,
    /// Seed for shuffling the node visiting order. `None` visits in index order.
    pub seed: Option<u64>,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 100,
            max_levels: 32,
            tolerance: 1e-7,
            seed: None,
        }
    }
}

/// Result of Louvain community detection
#[derive(Debug, Clone)]
pub struct LouvainResult {
    /// Map of NodeId -> community id (contiguous, starting at 0)
    pub assignments: HashMap<NodeId, usize>,
    /// Community id per dense index, aligned with the input view
    pub membership: Vec<usize>,
    /// Number of distinct communities
    pub community_count: usize,
    /// Modularity of the final partition on the input view
    pub modularity: f64,
    /// Aggregation levels that moved at least one node
    pub levels: usize,
}

/// Louvain community detection.
///
/// Phase 1 moves each node to the neighbouring community with the largest
/// positive modularity gain until no move helps. Phase 2 collapses every
/// community into a super-node and the process repeats on the condensed
/// graph. Stops when a level moves nothing or gains less than the tolerance.
pub fn louvain(graph: &UndirectedView, config: LouvainConfig) -> LouvainResult {
    let n = graph.node_count;
    let mut membership: Vec<usize> = (0..n).collect();
    let m = graph.total_weight();

    if n == 0 || m <= 0.0 {
        return finish(graph, membership, 0, config.resolution);
    }

    let mut rng = config.seed.map(StdRng::seed_from_u64);
    let mut level_graph = graph.clone();
    let mut current_q = modularity(graph, &membership, config.resolution);
    let mut levels = 0;

    while levels < config.max_levels {
        let (moved, local) = local_moving(&level_graph, &config, rng.as_mut());
        if !moved {
            break;
        }

        let (local, community_count) = renumber(&local);
        for c in membership.iter_mut() {
            *c = local[*c];
        }
        levels += 1;

        let new_q = modularity(graph, &membership, config.resolution);
        let gain = new_q - current_q;
        current_q = new_q;
        if gain < config.tolerance || community_count == level_graph.node_count {
            break;
        }

        level_graph = aggregate(&level_graph, &local, community_count);
    }

    finish(graph, membership, levels, config.resolution)
}

/// Local moving phase on one level. Returns whether any node moved and the
/// community of every level node.
fn local_moving(
    graph: &UndirectedView,
    config: &LouvainConfig,
    rng: Option<&mut StdRng>,
) -> (bool, Vec<usize>) {
    let n = graph.node_count;
    let m2 = 2.0 * graph.total_weight();

    let strength: Vec<f64> = (0..n).map(|i| graph.strength(i)).collect();
    let mut community: Vec<usize> = (0..n).collect();
    let mut community_total: Vec<f64> = strength.clone();

    let mut order: Vec<usize> = (0..n).collect();
    if let Some(rng) = rng {
        order.shuffle(rng);
    }

    // Weight from the current node to each neighbouring community, plus the
    // communities touched in discovery order for deterministic tie-breaking
    let mut neighbor_weight = vec![0.0_f64; n];
    let mut is_touched = vec![false; n];
    let mut touched: Vec<usize> = Vec::new();

    let mut moved_any = false;

    for _ in 0..config.max_passes {
        let mut moved = false;

        for &i in &order {
            let own = community[i];
            let k_i = strength[i];

            touched.clear();
            touched.push(own);
            is_touched[own] = true;
            for (&j, &w) in graph.neighbors(i).iter().zip(graph.edge_weights(i)) {
                let c = community[j];
                if !is_touched[c] {
                    is_touched[c] = true;
                    touched.push(c);
                }
                neighbor_weight[c] += w;
            }

            // Take i out of its community
            community_total[own] -= k_i;

            let gain = |c: usize| {
                neighbor_weight[c] - config.resolution * community_total[c] * k_i / m2
            };

            let mut best = own;
            let mut best_gain = gain(own);
            for &c in touched.iter().skip(1) {
                let g = gain(c);
                if g > best_gain {
                    best_gain = g;
                    best = c;
                }
            }

            community_total[best] += k_i;
            if best != own {
                community[i] = best;
                moved = true;
            }

            for &c in &touched {
                neighbor_weight[c] = 0.0;
                is_touched[c] = false;
            }
        }

        if !moved {
            break;
        }
        moved_any = true;
    }

    (moved_any, community)
}

/// Collapse communities into super-nodes. Internal weight becomes a self-loop.
fn aggregate(graph: &UndirectedView, community: &[usize], community_count: usize) -> UndirectedView {
    let mut edges = Vec::with_capacity(graph.neighbors.len() / 2 + graph.node_count);

    for u in 0..graph.node_count {
        let cu = community[u];
        if graph.self_loops[u] > 0.0 {
            edges.push((cu, cu, graph.self_loops[u]));
        }
        for (&v, &w) in graph.neighbors(u).iter().zip(graph.edge_weights(u)) {
            // Each undirected edge is stored twice; keep one copy
            if u < v {
                edges.push((cu, community[v], w));
            }
        }
    }

    let ids = (0..community_count as NodeId).collect();
    UndirectedView::from_weighted_edges(ids, &edges)
}

/// Renumber community ids to `0..count` in order of first appearance.
fn renumber(community: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let renumbered = community
        .iter()
        .map(|&c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect();
    (renumbered, mapping.len())
}

fn finish(
    graph: &UndirectedView,
    membership: Vec<usize>,
    levels: usize,
    resolution: f64,
) -> LouvainResult {
    let (membership, community_count) = renumber(&membership);
    let modularity = modularity(graph, &membership, resolution);
    let assignments = graph
        .index_to_node
        .iter()
        .copied()
        .zip(membership.iter().copied())
        .collect();

    LouvainResult {
        assignments,
        membership,
        community_count,
        modularity,
        levels,
    }
}

/// Modularity of a partition given as a community id per dense index.
///
/// `Q = sum_c [ in_c / m - resolution * (tot_c / 2m)^2 ]` where `in_c` is the
/// edge weight inside community `c` and `tot_c` its total strength.
/// A graph without edges has modularity 0.0.
pub fn modularity(graph: &UndirectedView, membership: &[usize], resolution: f64) -> f64 {
    let m = graph.total_weight();
    if m <= 0.0 {
        return 0.0;
    }

    let mut internal: HashMap<usize, f64> = HashMap::new();
    let mut total: HashMap<usize, f64> = HashMap::new();

    for u in 0..graph.node_count {
        let cu = membership[u];
        *total.entry(cu).or_insert(0.0) += graph.strength(u);
        *internal.entry(cu).or_insert(0.0) += graph.self_loops[u];
        for (&v, &w) in graph.neighbors(u).iter().zip(graph.edge_weights(u)) {
            if u < v && membership[v] == cu {
                *internal.entry(cu).or_insert(0.0) += w;
            }
        }
    }

    // Sum in community order so the result is reproducible
    let mut communities: Vec<usize> = total.keys().copied().collect();
    communities.sort_unstable();

    communities
        .into_iter()
        .map(|c| {
            let in_c = internal.get(&c).copied().unwrap_or(0.0);
            let tot_c = total[&c];
            in_c / m - resolution * (tot_c / (2.0 * m)).powi(2)
        })
        .sum()
}

// ── Weakly Connected Components ─────────────────────────────────────────────

/// Result of WCC algorithm
#[derive(Debug, Clone)]
pub struct WccResult {
    /// Map of Component ID -> List of NodeIds
    pub components: HashMap<usize, Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: HashMap<NodeId, usize>,
}

impl WccResult {
    /// Size of the largest component (0 for an empty graph)
    pub fn largest_component_size(&self) -> usize {
        self.components.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut curr = i;
        while self.parent[curr] != root {
            let next = self.parent[curr];
            self.parent[curr] = root;
            curr = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        for &v_idx in view.successors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let mut components = HashMap::new();
    let mut node_component = HashMap::new();

    for i in 0..n {
        let root = uf.find(i);
        let node_id = view.index_to_node[i];

        components.entry(root).or_insert_with(Vec::new).push(node_id);
        node_component.insert(node_id, root);
    }

    WccResult {
        components,
        node_component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two 4-cliques joined by a single bridge edge
    fn two_cliques() -> UndirectedView {
        let mut edges = Vec::new();
        for base in [0usize, 4] {
            for i in 0..4 {
                for j in (i + 1)..4 {
                    edges.push((base + i, base + j, 1.0));
                }
            }
        }
        edges.push((3, 4, 1.0));
        UndirectedView::from_weighted_edges((1..=8).collect(), &edges)
    }

    #[test]
    fn test_louvain_two_cliques() {
        let graph = two_cliques();
        let result = louvain(&graph, LouvainConfig::default());

        assert_eq!(result.community_count, 2);
        let a = result.assignments[&1];
        let b = result.assignments[&5];
        assert_ne!(a, b);
        for id in 1..=4 {
            assert_eq!(result.assignments[&id], a);
        }
        for id in 5..=8 {
            assert_eq!(result.assignments[&id], b);
        }

        // 13 edges, 6 inside each clique, both communities total 13
        let expected = 12.0 / 13.0 - 2.0 * (13.0_f64 / 26.0).powi(2);
        assert!((result.modularity - expected).abs() < 1e-12);
    }

    #[test]
    fn test_louvain_seeded_is_reproducible() {
        let graph = two_cliques();
        let config = LouvainConfig {
            seed: Some(7),
            ..LouvainConfig::default()
        };

        let first = louvain(&graph, config);
        let second = louvain(&graph, config);
        assert_eq!(first.membership, second.membership);
        assert_eq!(first.modularity.to_bits(), second.modularity.to_bits());
    }

    #[test]
    fn test_louvain_no_edges() {
        let graph = UndirectedView::from_weighted_edges(vec![1, 2, 3], &[]);
        let result = louvain(&graph, LouvainConfig::default());

        assert_eq!(result.community_count, 3);
        assert_eq!(result.modularity, 0.0);
        assert_eq!(result.levels, 0);
    }

    #[test]
    fn test_louvain_bounds_on_ring() {
        // Ring of 30 nodes: communities are arcs
        let edges: Vec<(usize, usize, f64)> = (0..30).map(|i| (i, (i + 1) % 30, 1.0)).collect();
        let graph = UndirectedView::from_weighted_edges((0..30).collect(), &edges);
        let result = louvain(&graph, LouvainConfig::default());

        assert!(result.community_count >= 1);
        assert!(result.community_count <= 30);
        assert!(result.modularity > 0.0 && result.modularity <= 1.0);
        assert!(result.membership.iter().all(|&c| c < result.community_count));
    }

    #[test]
    fn test_modularity_single_community() {
        let graph = two_cliques();
        let q = modularity(&graph, &[0; 8], 1.0);
        // in = m, tot = 2m
        assert!(q.abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_keeps_internal_weight() {
        let graph = two_cliques();
        let community = [0, 0, 0, 0, 1, 1, 1, 1];
        let agg = aggregate(&graph, &community, 2);

        assert_eq!(agg.node_count, 2);
        assert_eq!(agg.self_loops, vec![6.0, 6.0]);
        assert_eq!(agg.edge_weights(0), &[1.0]);
        assert_eq!(agg.total_weight(), graph.total_weight());
    }

    #[test]
    fn test_wcc() {
        // Nodes: 1, 2, 3, 4, 5, 6
        // Edges: 1->2, 3->4->5, 6 (isolated)
        let view = GraphView::from_edges(vec![1, 2, 3, 4, 5, 6], &[(0, 1), (2, 3), (3, 4)]);

        let result = weakly_connected_components(&view);

        assert_eq!(result.components.len(), 3);
        assert_eq!(result.largest_component_size(), 3);

        let c1 = result.node_component[&1];
        let c2 = result.node_component[&2];
        assert_eq!(c1, c2);

        let c3 = result.node_component[&3];
        let c4 = result.node_component[&4];
        let c5 = result.node_component[&5];
        assert_eq!(c3, c4);
        assert_eq!(c4, c5);
        assert_ne!(c1, c3);
    }
}
