//! Report pipeline
//!
//! Runs every stage over a loaded `EmailGraph` in a fixed order and collects
//! the results into an `AnalysisReport`. Stages are pure; the graph is never
//! modified.

pub mod crosstab;

pub use crosstab::label_agreement;

use crate::config::ReportConfig;
use crate::error::MailnetResult;
use crate::graph::{EmailGraph, NodeId};
use crate::report::{
    top_nodes, AnalysisReport, CommunityReport, Convergence, DegreeReport, GraphOverview,
    MeasureReport, NodeScores,
};
use crate::stats::{group_degree_stats, out_degrees, Histogram, Summary};
use mailnet_algorithms::{
    betweenness_centrality, closeness_centrality, eigenvector_centrality, louvain, page_rank,
    path_metrics, weakly_connected_components,
};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// Compute the full report for a graph.
///
/// Deterministic: the same graph and config always produce the same report.
pub fn analyze(graph: &EmailGraph, config: &ReportConfig) -> MailnetResult<AnalysisReport> {
    config.validate()?;

    let _span = info_span!("analyze", nodes = graph.node_count(), edges = graph.edge_count())
        .entered();
    let started = Instant::now();
    let view = graph.view();
    let node_order: Vec<NodeId> = graph.nodes().collect();

    // Descriptive stats
    let degrees = out_degrees(graph);
    let degree_counts: Vec<usize> = node_order.iter().map(|n| degrees[n]).collect();
    let degree_values: Vec<f64> = degree_counts.iter().map(|&d| d as f64).collect();
    let mut groups = group_degree_stats(graph, &degrees);
    groups.truncate(config.top_groups);
    let degree = DegreeReport {
        summary: Summary::of_counts(&degree_counts),
        histogram: Histogram::new(&degree_values, config.histogram_bins),
        lowest_variance_groups: groups,
    };
    debug!("Out-degree mean {:.3}, sd {:.3}", degree.summary.mean, degree.summary.sd);

    let wcc = weakly_connected_components(view);
    let overview = GraphOverview {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        group_count: graph.group_count(),
        groups_present: graph.groups_present(),
        weak_components: wcc.components.len(),
        largest_component: wcc.largest_component_size(),
    };
    if overview.weak_components > 1 {
        warn!(
            "Graph has {} weakly connected components; path metrics cover reachable pairs only",
            overview.weak_components
        );
    }

    // Path metrics
    let stage = Instant::now();
    let paths = path_metrics(view);
    info!(
        "Path metrics: diameter {}, average path length {:.4} ({:?})",
        paths.diameter,
        paths.average_path_length,
        stage.elapsed()
    );

    // Centrality suite
    let stage = Instant::now();
    let betweenness = betweenness_centrality(view);
    info!("Betweenness centrality computed ({:?})", stage.elapsed());

    let stage = Instant::now();
    let closeness = closeness_centrality(view);
    info!("Closeness centrality computed ({:?})", stage.elapsed());

    let undirected = graph.undirected_projection();

    let stage = Instant::now();
    let eigen = eigenvector_centrality(&undirected, (&config.eigenvector).into());
    if !eigen.converged {
        warn!("Eigenvector centrality did not converge after {} iterations", eigen.iterations);
    }
    info!("Eigenvector centrality computed in {} iterations ({:?})", eigen.iterations, stage.elapsed());

    let stage = Instant::now();
    let pagerank = page_rank(view, (&config.pagerank).into());
    if !pagerank.converged {
        warn!("PageRank did not converge after {} iterations", pagerank.iterations);
    }
    info!("PageRank computed in {} iterations ({:?})", pagerank.iterations, stage.elapsed());

    // Communities
    let stage = Instant::now();
    let communities = louvain(&undirected, (&config.louvain).into());
    info!(
        "Louvain found {} communities, modularity {:.4} ({:?})",
        communities.community_count,
        communities.modularity,
        stage.elapsed()
    );
    let agreement: HashMap<NodeId, f64> =
        label_agreement(graph, &communities.assignments).into_iter().collect();

    let nodes: Vec<NodeScores> = graph
        .labels()
        .iter()
        .map(|(&node, &group)| NodeScores {
            node,
            group,
            out_degree: degrees[&node],
            betweenness: betweenness.get(&node).copied().unwrap_or(0.0),
            closeness: closeness.get(&node).copied().unwrap_or(0.0),
            eigenvector: eigen.scores.get(&node).copied().unwrap_or(0.0),
            pagerank: pagerank.scores.get(&node).copied().unwrap_or(0.0),
            community: communities.assignments.get(&node).copied().unwrap_or(0),
            label_agreement: agreement.get(&node).copied().unwrap_or(0.0),
        })
        .collect();

    let measure = |select: fn(&NodeScores) -> f64, convergence: Option<Convergence>| {
        let values: Vec<(NodeId, f64)> = nodes.iter().map(|n| (n.node, select(n))).collect();
        let plain: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
        MeasureReport {
            summary: Summary::of(&plain),
            histogram: Histogram::new(&plain, config.histogram_bins),
            top: top_nodes(&values, config.top_nodes),
            convergence,
        }
    };

    let agreement_values: Vec<f64> = nodes.iter().map(|n| n.label_agreement).collect();
    let mut sizes = vec![0usize; communities.community_count];
    for &c in &communities.membership {
        sizes[c] += 1;
    }
    sizes.sort_unstable_by(|a, b| b.cmp(a));

    let report = AnalysisReport {
        overview,
        degree,
        paths,
        betweenness: measure(|n| n.betweenness, None),
        closeness: measure(|n| n.closeness, None),
        eigenvector: measure(
            |n| n.eigenvector,
            Some(Convergence {
                iterations: eigen.iterations,
                converged: eigen.converged,
            }),
        ),
        pagerank: measure(
            |n| n.pagerank,
            Some(Convergence {
                iterations: pagerank.iterations,
                converged: pagerank.converged,
            }),
        ),
        communities: CommunityReport {
            count: communities.community_count,
            modularity: communities.modularity,
            levels: communities.levels,
            sizes,
            label_agreement: Summary::of(&agreement_values),
            label_agreement_histogram: Histogram::new(&agreement_values, config.histogram_bins),
        },
        nodes,
    };

    info!("Report complete ({:?})", started.elapsed());
    Ok(report)
}
