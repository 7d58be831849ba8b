//! Detected communities against true group labels

use crate::graph::{EmailGraph, GroupLabel, NodeId};
use rustc_hash::FxHashMap;
use std::collections::HashMap;

/// For every node, the percentage (0..=100) of its community's members that
/// share its true group label, the node itself included.
///
/// Nodes missing from `assignments` are skipped.
pub fn label_agreement(
    graph: &EmailGraph,
    assignments: &HashMap<NodeId, usize>,
) -> Vec<(NodeId, f64)> {
    let mut community_size: FxHashMap<usize, usize> = FxHashMap::default();
    let mut shared: FxHashMap<(usize, GroupLabel), usize> = FxHashMap::default();

    for (node, label) in graph.labels() {
        if let Some(&community) = assignments.get(node) {
            *community_size.entry(community).or_insert(0) += 1;
            *shared.entry((community, *label)).or_insert(0) += 1;
        }
    }

    graph
        .labels()
        .iter()
        .filter_map(|(node, label)| {
            let community = *assignments.get(node)?;
            let same = shared[&(community, *label)] as f64;
            let size = community_size[&community] as f64;
            Some((*node, 100.0 * same / size))
        })
        .collect()
}
