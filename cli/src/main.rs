//! Mailnet CLI: command-line front end for the email-graph report
//!
//! Loads the edge list and label list, runs the analysis pipeline and prints
//! the results as tables, JSON or CSV.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use mailnet::report::MeasureReport;
use mailnet::stats::{Histogram, Summary};
use mailnet::{analyze, AnalysisReport, EmailGraph, Measure, NodeScores, ReportConfig};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailnet", version, about = "Email communication graph report")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum MeasureArg {
    OutDegree,
    Betweenness,
    Closeness,
    Eigenvector,
    Pagerank,
    LabelAgreement,
}

impl From<MeasureArg> for Measure {
    fn from(arg: MeasureArg) -> Self {
        match arg {
            MeasureArg::OutDegree => Measure::OutDegree,
            MeasureArg::Betweenness => Measure::Betweenness,
            MeasureArg::Closeness => Measure::Closeness,
            MeasureArg::Eigenvector => Measure::Eigenvector,
            MeasureArg::Pagerank => Measure::PageRank,
            MeasureArg::LabelAgreement => Measure::LabelAgreement,
        }
    }
}

#[derive(Args)]
struct InputArgs {
    /// Edge list: one `from to` pair per line
    #[arg(long)]
    edges: PathBuf,

    /// Label list: one `node group` pair per line, groups 0-based
    #[arg(long)]
    labels: PathBuf,

    /// YAML report configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of research groups (overrides the config file)
    #[arg(long)]
    groups: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full report
    Report {
        #[command(flatten)]
        inputs: InputArgs,

        /// Louvain shuffle seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Histogram bins (overrides the config file)
        #[arg(long)]
        bins: Option<usize>,

        /// Print histograms as text bars
        #[arg(long)]
        histograms: bool,
    },
    /// List per-node scores
    Nodes {
        #[command(flatten)]
        inputs: InputArgs,

        /// Measure to sort by, highest first
        #[arg(long, default_value = "pagerank")]
        sort_by: MeasureArg,

        /// Maximum number of rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Validate the input files and print their size
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Report { inputs, seed, bins, histograms } => {
            run_report(&inputs, seed, bins, histograms, cli.format)
        }
        Commands::Nodes { inputs, sort_by, limit } => {
            run_nodes(&inputs, sort_by.into(), limit, cli.format)
        }
        Commands::Check { inputs } => run_check(&inputs, cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line values that take precedence over the config file
#[derive(Default)]
struct Overrides {
    groups: Option<u16>,
    seed: Option<u64>,
    bins: Option<usize>,
}

fn load_config(inputs: &InputArgs, overrides: Overrides) -> Result<ReportConfig> {
    let config = match &inputs.config {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ReportConfig::default(),
    };
    let config = apply_overrides(config, overrides)?;
    debug!("Report config: {:?}", config);
    Ok(config)
}

fn apply_overrides(mut config: ReportConfig, overrides: Overrides) -> Result<ReportConfig> {
    if let Some(groups) = overrides.groups {
        config.group_count = groups;
    }
    if overrides.seed.is_some() {
        config.louvain.seed = overrides.seed;
    }
    if let Some(bins) = overrides.bins {
        config.histogram_bins = bins;
    }
    config.validate().context("invalid command-line override")?;
    Ok(config)
}

fn load_graph(inputs: &InputArgs, config: &ReportConfig) -> Result<EmailGraph> {
    EmailGraph::load(&inputs.edges, &inputs.labels, config.group_count)
        .context("loading email graph")
}

fn run_report(
    inputs: &InputArgs,
    seed: Option<u64>,
    bins: Option<usize>,
    histograms: bool,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(
        inputs,
        Overrides {
            groups: inputs.groups,
            seed,
            bins,
        },
    )?;

    let graph = load_graph(inputs, &config)?;
    let report = analyze(&graph, &config)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => {
            println!("measure,count,mean,sd,median,skewness,min,max,q25,q75,q90,q99");
            for (name, summary) in summaries(&report) {
                println!(
                    "{},{},{},{},{},{},{},{},{},{},{},{}",
                    name,
                    summary.count,
                    summary.mean,
                    summary.sd,
                    summary.median,
                    summary.skewness,
                    summary.min,
                    summary.max,
                    summary.q25,
                    summary.q75,
                    summary.q90,
                    summary.q99
                );
            }
        }
        OutputFormat::Table => print_report(&report, histograms),
    }

    Ok(())
}

fn summaries(report: &AnalysisReport) -> Vec<(&'static str, &Summary)> {
    vec![
        ("out_degree", &report.degree.summary),
        ("betweenness", &report.betweenness.summary),
        ("closeness", &report.closeness.summary),
        ("eigenvector", &report.eigenvector.summary),
        ("pagerank", &report.pagerank.summary),
        ("label_agreement", &report.communities.label_agreement),
    ]
}

fn print_report(report: &AnalysisReport, histograms: bool) {
    let o = &report.overview;
    println!("Mailnet report v{}", mailnet::version());
    println!("==========================================");
    println!("Nodes:             {}", o.nodes);
    println!("Edges:             {}", o.edges);
    println!("Groups:            {} of {}", o.groups_present, o.group_count);
    println!("Weak components:   {} (largest {})", o.weak_components, o.largest_component);
    println!("Diameter:          {}", report.paths.diameter);
    println!("Avg path length:   {:.4}", report.paths.average_path_length);
    println!("Communities:       {}", report.communities.count);
    println!("Modularity:        {:.4}", report.communities.modularity);
    println!();

    let mut table = new_table(&["measure", "mean", "sd", "median", "skewness", "min", "max", "q90"]);
    for (name, s) in summaries(report) {
        table.add_row(vec![
            name.to_string(),
            fmt_value(s.mean),
            fmt_value(s.sd),
            fmt_value(s.median),
            fmt_value(s.skewness),
            fmt_value(s.min),
            fmt_value(s.max),
            fmt_value(s.q90),
        ]);
    }
    println!("{}", table);
    println!();

    println!("Lowest out-degree variance groups");
    let mut table = new_table(&["group", "nodes", "mean", "sd"]);
    for g in &report.degree.lowest_variance_groups {
        table.add_row(vec![
            g.group.to_string(),
            g.nodes.to_string(),
            fmt_value(g.mean),
            g.sd.map(fmt_value).unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{}", table);
    println!();

    let measures: [(&str, &MeasureReport); 4] = [
        ("betweenness", &report.betweenness),
        ("closeness", &report.closeness),
        ("eigenvector", &report.eigenvector),
        ("pagerank", &report.pagerank),
    ];
    println!("Top nodes");
    let mut table = new_table(&["rank", "betweenness", "closeness", "eigenvector", "pagerank"]);
    let rows = measures.iter().map(|(_, m)| m.top.len()).max().unwrap_or(0);
    for rank in 0..rows {
        let mut row = vec![(rank + 1).to_string()];
        for (_, m) in &measures {
            row.push(
                m.top
                    .get(rank)
                    .map(|r| format!("{} ({})", r.node, fmt_value(r.value)))
                    .unwrap_or_default(),
            );
        }
        table.add_row(row);
    }
    println!("{}", table);

    for (name, m) in &measures {
        if let Some(c) = m.convergence {
            if !c.converged {
                println!("warning: {} stopped after {} iterations without converging", name, c.iterations);
            }
        }
    }

    if histograms {
        println!();
        print_histogram("out-degree", &report.degree.histogram);
        for (name, m) in &measures {
            print_histogram(name, &m.histogram);
        }
        print_histogram("label agreement (%)", &report.communities.label_agreement_histogram);
    }
}

fn print_histogram(title: &str, histogram: &Histogram) {
    const WIDTH: usize = 40;
    println!("{}", title);
    let peak = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &histogram.bins {
        let bar = "#".repeat(bin.count * WIDTH / peak);
        println!(
            "  [{:>10} , {:>10}] {:>6} {}",
            fmt_value(bin.lower),
            fmt_value(bin.upper),
            bin.count,
            bar
        );
    }
    println!();
}

fn run_nodes(
    inputs: &InputArgs,
    sort_by: Measure,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let config = load_config(
        inputs,
        Overrides {
            groups: inputs.groups,
            ..Overrides::default()
        },
    )?;
    let graph = load_graph(inputs, &config)?;
    let report = analyze(&graph, &config)?;
    let nodes = report.ranked(sort_by, limit);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
        OutputFormat::Csv => {
            println!("{}", NODE_COLUMNS.join(","));
            for n in &nodes {
                println!("{}", node_cells(n).join(","));
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(&NODE_COLUMNS);
            for n in &nodes {
                table.add_row(node_cells(n));
            }
            println!("{}", table);
            println!("{} row(s), sorted by {}", nodes.len(), sort_by);
        }
    }

    Ok(())
}

const NODE_COLUMNS: [&str; 9] = [
    "node",
    "group",
    "out_degree",
    "betweenness",
    "closeness",
    "eigenvector",
    "pagerank",
    "community",
    "label_agreement",
];

fn node_cells(n: &NodeScores) -> Vec<String> {
    vec![
        n.node.to_string(),
        n.group.to_string(),
        n.out_degree.to_string(),
        n.betweenness.to_string(),
        n.closeness.to_string(),
        n.eigenvector.to_string(),
        n.pagerank.to_string(),
        n.community.to_string(),
        n.label_agreement.to_string(),
    ]
}

fn run_check(inputs: &InputArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(
        inputs,
        Overrides {
            groups: inputs.groups,
            ..Overrides::default()
        },
    )?;
    let graph = load_graph(inputs, &config)?;

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "groups": graph.groups_present(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            println!("OK");
            println!("Nodes:  {}", graph.node_count());
            println!("Edges:  {}", graph.edge_count());
            println!("Groups: {}", graph.groups_present());
        }
    }

    Ok(())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn fmt_value(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e12 {
        format!("{}", v as i64)
    } else if v.abs() >= 1e-3 {
        format!("{:.4}", v)
    } else {
        format!("{:.3e}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let config = apply_overrides(
            ReportConfig::default(),
            Overrides {
                groups: Some(7),
                seed: Some(3),
                bins: Some(5),
            },
        )
        .unwrap();

        assert_eq!(config.group_count, 7);
        assert_eq!(config.louvain.seed, Some(3));
        assert_eq!(config.histogram_bins, 5);
    }

    #[test]
    fn test_zero_groups_override_rejected() {
        let overrides = Overrides {
            groups: Some(0),
            ..Overrides::default()
        };
        assert!(apply_overrides(ReportConfig::default(), overrides).is_err());

        let overrides = Overrides {
            bins: Some(0),
            ..Overrides::default()
        };
        assert!(apply_overrides(ReportConfig::default(), overrides).is_err());
    }
}
