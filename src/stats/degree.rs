//! Out-degree sequence and per-group aggregates

use super::summary::{mean, sample_sd};
use crate::graph::{EmailGraph, GroupLabel, NodeId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Out-degree (emails sent) per node, parallel edges counted
pub fn out_degrees(graph: &EmailGraph) -> BTreeMap<NodeId, usize> {
    let view = graph.view();
    (0..view.node_count)
        .map(|idx| (view.index_to_node[idx], view.out_degree(idx)))
        .collect()
}

/// Out-degree statistics of one research group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group: GroupLabel,
    pub nodes: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for groups with a single member
    pub sd: Option<f64>,
}

/// Per-group out-degree mean and sd, sorted by ascending sd.
///
/// Groups without members are omitted. Groups with an undefined sd sort last;
/// ties keep group order.
pub fn group_degree_stats(
    graph: &EmailGraph,
    degrees: &BTreeMap<NodeId, usize>,
) -> Vec<GroupStats> {
    let mut by_group: BTreeMap<GroupLabel, Vec<f64>> = BTreeMap::new();
    for (node, label) in graph.labels() {
        let degree = degrees.get(node).copied().unwrap_or(0);
        by_group.entry(*label).or_default().push(degree as f64);
    }

    let mut stats: Vec<GroupStats> = by_group
        .into_iter()
        .map(|(group, values)| {
            let m = mean(&values);
            GroupStats {
                group,
                nodes: values.len(),
                mean: m,
                sd: (values.len() >= 2).then(|| sample_sd(&values, m)),
            }
        })
        .collect();

    stats.sort_by(|a, b| match (a.sd, b.sd) {
        (Some(x), Some(y)) => x.total_cmp(&y).then(a.group.cmp(&b.group)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.group.cmp(&b.group),
    });
    stats
}
