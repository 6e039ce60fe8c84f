//! `tg analyze`: run the full pipeline over the dataset catalogue.
//!
//! Per dataset: SCC on the loaded graph, Kahn on its condensation, then
//! shortest and longest paths. Paths run on the original graph when it is
//! already acyclic (one component per vertex) and on the condensation
//! otherwise, starting from the component that holds the source vertex.
//! Every run gets a fresh [`MetricsCollector`] and contributes rows to the
//! CSV report.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use taskgraph_core::{
    Graph, MetricsCollector, MetricsSnapshot, SccResult, find_longest_paths, find_sccs,
    find_shortest_paths, kahn_sort,
};
use tracing::{info, instrument, warn};

use crate::cmd::generate::write_catalogue;
use crate::cmd::{report_graph_error, resolve_path};
use crate::config::ProjectConfig;
use crate::datasets::DATASETS;
use crate::loader::{LoadedGraph, load_graph};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render};
use crate::report::{ReportRow, ReportWriter, RunRows};

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Directory holding the dataset files [config: analysis.data_dir].
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// CSV report path [config: analysis.output].
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Source vertex, overriding the one stored in each file.
    #[arg(long)]
    pub source: Option<usize>,

    /// Regenerate the datasets before analyzing.
    #[arg(long)]
    pub generate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathSection {
    /// Graph the path algorithms actually ran on.
    pub on_condensation: bool,
    pub source: usize,
    pub shortest_reachable: usize,
    pub average_distance: Option<f64>,
    pub critical_path: Vec<usize>,
    pub critical_path_length: i64,
    pub shortest_metrics: MetricsSnapshot,
    pub longest_metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub dataset: String,
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub largest_component: usize,
    pub topo_valid: bool,
    pub scc_metrics: MetricsSnapshot,
    pub topo_metrics: MetricsSnapshot,
    /// Absent for a graph without vertices.
    pub paths: Option<PathSection>,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    report: String,
    rows: usize,
    datasets: Vec<DatasetSummary>,
    missing: Vec<String>,
}

pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &ProjectConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let data_dir = resolve_path(
        project_root,
        args.data_dir.as_ref().unwrap_or(&config.analysis.data_dir),
    );
    let report_path = resolve_path(
        project_root,
        args.report.as_ref().unwrap_or(&config.analysis.output),
    );

    if args.generate {
        write_catalogue(&data_dir, config.generate.seed)?;
    }

    let mut report = ReportWriter::create(&report_path)?;
    let mut datasets = Vec::new();
    let mut missing = Vec::new();

    for spec in &DATASETS {
        let name = spec.file_name();
        let path = data_dir.join(&name);
        if !path.exists() {
            warn!(dataset = %name, path = %path.display(), "dataset not found");
            missing.push(name);
            continue;
        }

        let loaded = load_graph(&path)?;
        let source = args
            .source
            .or(loaded.source)
            .unwrap_or(config.analysis.default_source);

        let (summary, rows) = analyze_dataset(&name, &loaded, source).map_err(|err| {
            report_graph_error(output, &err).context(format!("while analyzing {name}"))
        })?;
        report.write_rows(&rows)?;
        datasets.push(summary);
    }

    let rows = report.rows_written();
    report.finish()?;
    info!(rows, report = %report_path.display(), "analysis complete");

    let payload = AnalyzeOutput {
        report: report_path.display().to_string(),
        rows,
        datasets,
        missing,
    };
    render(output, &payload, |p, w| render_analyze_human(p, output, w))
}

/// Run the pipeline on one loaded dataset.
#[instrument(skip_all, fields(dataset = name))]
pub fn analyze_dataset(
    name: &str,
    loaded: &LoadedGraph,
    source: usize,
) -> Result<(DatasetSummary, Vec<ReportRow>), taskgraph_core::GraphError> {
    let graph = &loaded.graph;
    let nodes = graph.vertex_count();
    let edges = graph.edge_count();
    let mut rows = Vec::new();

    let mut metrics = MetricsCollector::new();
    let scc = find_sccs(graph, &mut metrics);
    let scc_metrics = metrics.snapshot();
    let run = RunRows {
        dataset: name,
        nodes,
        edges,
        algorithm: "SCC",
        metrics: scc_metrics,
    };
    rows.extend([
        run.count("DFSVisits", scc_metrics.dfs_visits),
        run.count("EdgeTraversals", scc_metrics.edge_traversals),
        run.count("ComponentCount", scc.component_count() as u64),
        run.count("ExecutionTime", scc_metrics.elapsed_nanos),
    ]);

    let mut metrics = MetricsCollector::new();
    let topo = kahn_sort(scc.condensation(), &mut metrics);
    let topo_metrics = metrics.snapshot();
    let run = RunRows {
        algorithm: "Topo",
        metrics: topo_metrics,
        ..run
    };
    rows.extend([
        run.count("QueueOps", topo_metrics.queue_operations),
        run.count("EdgeTraversals", topo_metrics.edge_traversals),
        run.count("ExecutionTime", topo_metrics.elapsed_nanos),
        run.row("IsValidDAG", i64::from(topo.is_dag())),
    ]);

    let paths = if nodes == 0 {
        None
    } else {
        Some(run_paths(name, graph, &scc, source, &mut rows)?)
    };

    let summary = DatasetSummary {
        dataset: name.to_string(),
        nodes,
        edges,
        components: scc.component_count(),
        largest_component: scc.stats().largest,
        topo_valid: topo.is_dag(),
        scc_metrics,
        topo_metrics,
        paths,
    };
    info!(
        components = summary.components,
        topo_valid = summary.topo_valid,
        "dataset analyzed"
    );
    Ok((summary, rows))
}

fn run_paths(
    name: &str,
    graph: &Graph,
    scc: &SccResult,
    source: usize,
    rows: &mut Vec<ReportRow>,
) -> Result<PathSection, taskgraph_core::GraphError> {
    let nodes = graph.vertex_count();
    let edges = graph.edge_count();

    // A self-loop leaves every component a singleton but still blocks Kahn.
    let on_condensation = scc.has_cycles() || graph.edges().any(|e| e.from == e.to);
    let (dag, dag_source) = if on_condensation {
        (scc.condensation(), scc.component_of(source)?)
    } else {
        (graph, source)
    };

    let mut metrics = MetricsCollector::new();
    let shortest = find_shortest_paths(dag, dag_source, &mut metrics)?;
    let shortest_metrics = metrics.snapshot();
    let reachable = shortest.reachable_vertices().len();
    let average = shortest.average_distance();
    let run = RunRows {
        dataset: name,
        nodes,
        edges,
        algorithm: "ShortestPath",
        metrics: shortest_metrics,
    };
    #[allow(clippy::cast_possible_truncation)]
    let average_centi = (average.unwrap_or(0.0) * 100.0) as i64;
    rows.extend([
        run.count("Relaxations", shortest_metrics.relaxations),
        run.count("EdgeTraversals", shortest_metrics.edge_traversals),
        run.count("ExecutionTime", shortest_metrics.elapsed_nanos),
        run.count("ReachableVertices", reachable as u64),
        run.row("AvgDistance", average_centi),
    ]);

    let mut metrics = MetricsCollector::new();
    let longest = find_longest_paths(dag, dag_source, &mut metrics)?;
    let longest_metrics = metrics.snapshot();
    let run = RunRows {
        algorithm: "LongestPath",
        metrics: longest_metrics,
        ..run
    };
    rows.extend([
        run.count("Relaxations", longest_metrics.relaxations),
        run.count("EdgeTraversals", longest_metrics.edge_traversals),
        run.count("ExecutionTime", longest_metrics.elapsed_nanos),
        run.row("CriticalPathLength", longest.critical_path_length()),
        run.count("ReachableVertices", longest.reachable_vertices().len() as u64),
        run.count("CriticalPathVertices", longest.critical_path().len() as u64),
    ]);

    Ok(PathSection {
        on_condensation,
        source: dag_source,
        shortest_reachable: reachable,
        average_distance: average,
        critical_path: longest.critical_path().to_vec(),
        critical_path_length: longest.critical_path_length(),
        shortest_metrics,
        longest_metrics,
    })
}

fn render_analyze_human(
    payload: &AnalyzeOutput,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    for name in &payload.missing {
        writeln!(w, "warning: dataset not found: {name}")?;
    }

    for d in &payload.datasets {
        if mode.is_pretty() {
            pretty_section(w, &d.dataset)?;
            pretty_kv(w, "Graph", format!("{} nodes, {} edges", d.nodes, d.edges))?;
            pretty_kv(
                w,
                "SCC components",
                format!("{} (largest {})", d.components, d.largest_component),
            )?;
            pretty_kv(w, "Topo order valid", d.topo_valid.to_string())?;
            if let Some(p) = &d.paths {
                let target = if p.on_condensation {
                    "condensation"
                } else {
                    "original"
                };
                pretty_kv(w, "Paths on", format!("{target} graph from {}", p.source))?;
                pretty_kv(w, "Shortest reachable", p.shortest_reachable.to_string())?;
                pretty_kv(w, "Critical length", p.critical_path_length.to_string())?;
                pretty_kv(w, "Critical path", format!("{:?}", p.critical_path))?;
            }
            writeln!(w)?;
            for (label, metrics) in [("SCC", &d.scc_metrics), ("Topo", &d.topo_metrics)] {
                writeln!(w, "  {label}")?;
                for line in metrics.report().lines() {
                    writeln!(w, "    {line}")?;
                }
            }
            writeln!(w)?;
        } else {
            write!(
                w,
                "{} nodes={} edges={} components={} topo_valid={}",
                d.dataset, d.nodes, d.edges, d.components, d.topo_valid
            )?;
            if let Some(p) = &d.paths {
                write!(
                    w,
                    " reachable={} critical_length={}",
                    p.shortest_reachable, p.critical_path_length
                )?;
            }
            writeln!(w)?;
        }
    }

    if mode.is_pretty() {
        pretty_rule(w)?;
    }
    writeln!(w, "report: {} ({} rows)", payload.report, payload.rows)
}
