//! Analysis results
//!
//! The report is a plain immutable value keyed by node id. It serializes to
//! JSON for downstream rendering.

use crate::graph::{GroupLabel, NodeId};
use crate::stats::{GroupStats, Histogram, Summary};
use mailnet_algorithms::PathMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Everything computed for one input graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overview: GraphOverview,
    pub degree: DegreeReport,
    pub paths: PathMetrics,
    pub betweenness: MeasureReport,
    pub closeness: MeasureReport,
    pub eigenvector: MeasureReport,
    pub pagerank: MeasureReport,
    pub communities: CommunityReport,
    /// Per-node attributes in input order
    pub nodes: Vec<NodeScores>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphOverview {
    pub nodes: usize,
    pub edges: usize,
    /// Size of the group enumeration
    pub group_count: u16,
    /// Groups with at least one member
    pub groups_present: usize,
    pub weak_components: usize,
    pub largest_component: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeReport {
    pub summary: Summary,
    pub histogram: Histogram,
    /// Groups with the lowest out-degree sd, ascending
    pub lowest_variance_groups: Vec<GroupStats>,
}

/// Distribution of one per-node measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureReport {
    pub summary: Summary,
    pub histogram: Histogram,
    /// Highest-scoring nodes, descending
    pub top: Vec<RankedNode>,
    /// Set for iterative measures
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub convergence: Option<Convergence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    pub node: NodeId,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub count: usize,
    pub modularity: f64,
    /// Aggregation levels performed by Louvain
    pub levels: usize,
    /// Community sizes, largest first
    pub sizes: Vec<usize>,
    /// Percentage of a node's community sharing its true group
    pub label_agreement: Summary,
    pub label_agreement_histogram: Histogram,
}

/// Every derived attribute of one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeScores {
    pub node: NodeId,
    pub group: GroupLabel,
    pub out_degree: usize,
    pub betweenness: f64,
    pub closeness: f64,
    pub eigenvector: f64,
    pub pagerank: f64,
    pub community: usize,
    pub label_agreement: f64,
}

/// Per-node measure selectable for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    OutDegree,
    Betweenness,
    Closeness,
    Eigenvector,
    PageRank,
    LabelAgreement,
}

impl Measure {
    pub const ALL: [Measure; 6] = [
        Measure::OutDegree,
        Measure::Betweenness,
        Measure::Closeness,
        Measure::Eigenvector,
        Measure::PageRank,
        Measure::LabelAgreement,
    ];

    pub fn value(&self, scores: &NodeScores) -> f64 {
        match self {
            Measure::OutDegree => scores.out_degree as f64,
            Measure::Betweenness => scores.betweenness,
            Measure::Closeness => scores.closeness,
            Measure::Eigenvector => scores.eigenvector,
            Measure::PageRank => scores.pagerank,
            Measure::LabelAgreement => scores.label_agreement,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Measure::OutDegree => "out_degree",
            Measure::Betweenness => "betweenness",
            Measure::Closeness => "closeness",
            Measure::Eigenvector => "eigenvector",
            Measure::PageRank => "pagerank",
            Measure::LabelAgreement => "label_agreement",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown measure '{}'", s))
    }
}

impl AnalysisReport {
    pub fn node(&self, node: NodeId) -> Option<&NodeScores> {
        self.nodes.iter().find(|n| n.node == node)
    }

    /// Nodes sorted by a measure, highest first; ties by node id
    pub fn ranked(&self, measure: Measure, limit: Option<usize>) -> Vec<&NodeScores> {
        let mut nodes: Vec<&NodeScores> = self.nodes.iter().collect();
        nodes.sort_by(|a, b| {
            measure
                .value(b)
                .total_cmp(&measure.value(a))
                .then(a.node.cmp(&b.node))
        });
        if let Some(limit) = limit {
            nodes.truncate(limit);
        }
        nodes
    }
}

/// Top `k` nodes by value, highest first; ties by node id
pub(crate) fn top_nodes(values: &[(NodeId, f64)], k: usize) -> Vec<RankedNode> {
    let mut ranked: Vec<RankedNode> = values
        .iter()
        .map(|&(node, value)| RankedNode { node, value })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.node.cmp(&b.node)));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_names_round_trip() {
        for measure in Measure::ALL {
            assert_eq!(measure.name().parse::<Measure>(), Ok(measure));
        }
        assert!("degree".parse::<Measure>().is_err());
    }

    #[test]
    fn test_top_nodes_breaks_ties_by_id() {
        let values = [(3, 0.5), (1, 0.5), (2, 0.9), (4, 0.1)];
        let top = top_nodes(&values, 3);

        let ids: Vec<NodeId> = top.iter().map(|r| r.node).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
