//! Shortest-path metrics
//!
//! Unweighted (hop count) distances along out-edges, plus whole-graph
//! diameter and average path length.

use super::common::GraphView;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Graph-wide shortest-path statistics
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathMetrics {
    /// Longest finite shortest path over ordered pairs `u != v`
    pub diameter: u32,
    /// Mean shortest path over ordered reachable pairs `u != v`
    pub average_path_length: f64,
    /// Number of ordered pairs `u != v` with `v` reachable from `u`
    pub reachable_pairs: u64,
}

/// Breadth-First Search distances from `source` along outgoing edges.
///
/// `None` marks nodes that cannot be reached.
pub fn bfs_distances(view: &GraphView, source: usize) -> Vec<Option<u32>> {
    let mut dist = vec![None; view.node_count];
    let mut queue = VecDeque::new();

    dist[source] = Some(0);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let next_dist = dist[current].map_or(0, |d| d + 1);
        for &next in view.successors(current) {
            if dist[next].is_none() {
                dist[next] = Some(next_dist);
                queue.push_back(next);
            }
        }
    }

    dist
}

/// Diameter and average path length of a directed graph.
///
/// Unreachable pairs and self pairs are excluded from both values. A graph
/// without any reachable pair reports diameter 0 and average 0.0.
pub fn path_metrics(view: &GraphView) -> PathMetrics {
    // (max distance, distance sum, pair count) per source; integer sums keep
    // the reduction order-independent
    let (diameter, total, pairs) = (0..view.node_count)
        .into_par_iter()
        .map(|source| {
            let mut max = 0u32;
            let mut sum = 0u64;
            let mut count = 0u64;
            for (target, d) in bfs_distances(view, source).into_iter().enumerate() {
                if target == source {
                    continue;
                }
                if let Some(d) = d {
                    max = max.max(d);
                    sum += u64::from(d);
                    count += 1;
                }
            }
            (max, sum, count)
        })
        .reduce(
            || (0u32, 0u64, 0u64),
            |(m1, s1, c1), (m2, s2, c2)| (m1.max(m2), s1 + s2, c1 + c2),
        );

    let average_path_length = if pairs == 0 {
        0.0
    } else {
        total as f64 / pairs as f64
    };

    PathMetrics {
        diameter,
        average_path_length,
        reachable_pairs: pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bfs_distances() {
        // 1->2->3, 4 isolated
        let view = GraphView::from_edges(vec![1, 2, 3, 4], &[(0, 1), (1, 2)]);

        let dist = bfs_distances(&view, 0);
        assert_eq!(dist, vec![Some(0), Some(1), Some(2), None]);

        // Direction is respected
        let back = bfs_distances(&view, 2);
        assert_eq!(back, vec![None, None, Some(0), None]);
    }

    #[test]
    fn test_triangle_metrics() {
        // 1->2, 2->3, 1->3
        let view = GraphView::from_edges(vec![1, 2, 3], &[(0, 1), (1, 2), (0, 2)]);
        let metrics = path_metrics(&view);

        assert_eq!(metrics.diameter, 1);
        assert_eq!(metrics.average_path_length, 1.0);
        assert_eq!(metrics.reachable_pairs, 3);
    }

    #[test]
    fn test_chain_metrics() {
        // 1->2->3->4: pairs at distance 1 (x3), 2 (x2), 3 (x1)
        let view = GraphView::from_edges(vec![1, 2, 3, 4], &[(0, 1), (1, 2), (2, 3)]);
        let metrics = path_metrics(&view);

        assert_eq!(metrics.diameter, 3);
        assert_eq!(metrics.reachable_pairs, 6);
        assert!((metrics.average_path_length - 10.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_edges() {
        let view = GraphView::from_edges(vec![1, 2, 3], &[]);
        let metrics = path_metrics(&view);

        assert_eq!(metrics.diameter, 0);
        assert_eq!(metrics.average_path_length, 0.0);
        assert_eq!(metrics.reachable_pairs, 0);
    }

    #[test]
    fn test_self_loops_and_parallel_edges_ignored() {
        let view = GraphView::from_edges(vec![1, 2], &[(0, 0), (0, 1), (0, 1)]);
        let metrics = path_metrics(&view);

        assert_eq!(metrics.diameter, 1);
        assert_eq!(metrics.reachable_pairs, 1);
    }
}
