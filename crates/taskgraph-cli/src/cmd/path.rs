//! `tg path`: shortest or longest paths over one DAG file.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde::Serialize;
use taskgraph_core::{
    MetricsCollector, MetricsSnapshot, PathKind, PathResult, PathSummary, find_longest_paths,
    find_shortest_paths, overall_critical_path,
};

use crate::cmd::{report_graph_error, resolve_path, write_metrics};
use crate::config::AnalysisConfig;
use crate::loader::load_graph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[default]
    Shortest,
    Longest,
}

impl From<KindArg> for PathKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Shortest => Self::Shortest,
            KindArg::Longest => Self::Longest,
        }
    }
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Graph file (JSON). Must be acyclic.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = KindArg::Shortest)]
    pub kind: KindArg,

    /// Source vertex [file `source`, then config: analysis.default_source].
    #[arg(long)]
    pub source: Option<usize>,

    /// Longest critical path over every source (implies --kind longest).
    #[arg(long, conflicts_with = "source")]
    pub all_sources: bool,

    /// Follow edges backwards, measuring paths that end at the source.
    #[arg(long)]
    pub reverse: bool,
}

#[derive(Debug, Serialize)]
struct VertexDistance {
    vertex: usize,
    /// `null` when unreachable.
    distance: Option<i64>,
    parent: Option<usize>,
}

#[derive(Debug, Serialize)]
struct PathOutput {
    #[serde(flatten)]
    summary: PathSummary,
    distances: Vec<VertexDistance>,
    metrics: MetricsSnapshot,
}

impl PathOutput {
    fn new(result: &PathResult, metrics: MetricsSnapshot) -> Self {
        let distances = result
            .distances()
            .iter()
            .zip(result.parents())
            .enumerate()
            .map(|(vertex, (d, p))| VertexDistance {
                vertex,
                distance: d.finite(),
                parent: *p,
            })
            .collect();
        Self {
            summary: result.summary(),
            distances,
            metrics,
        }
    }
}

pub fn run_path(
    args: &PathArgs,
    config: &AnalysisConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let loaded = load_graph(&resolve_path(project_root, &args.file))?;
    let graph = if args.reverse {
        loaded.graph.reverse()
    } else {
        loaded.graph
    };
    let mut metrics = MetricsCollector::new();

    let result = if args.all_sources {
        match overall_critical_path(&graph, &mut metrics) {
            Ok(Some(best)) => best,
            Ok(None) => anyhow::bail!("graph has no vertices"),
            Err(e) => return Err(report_graph_error(output, &e)),
        }
    } else {
        let source = args
            .source
            .or(loaded.source)
            .unwrap_or(config.default_source);
        let run = match PathKind::from(args.kind) {
            PathKind::Shortest => find_shortest_paths(&graph, source, &mut metrics),
            PathKind::Longest => find_longest_paths(&graph, source, &mut metrics),
        };
        run.map_err(|e| report_graph_error(output, &e))?
    };

    let payload = PathOutput::new(&result, metrics.snapshot());
    render(output, &payload, |p, w| render_path_human(p, output, w))
}

fn render_path_human(payload: &PathOutput, mode: OutputMode, w: &mut dyn Write) -> std::io::Result<()> {
    let summary = &payload.summary;
    let fmt_distance = |d: Option<i64>| match (d, summary.kind) {
        (Some(d), _) => d.to_string(),
        (None, PathKind::Shortest) => "inf".to_string(),
        (None, PathKind::Longest) => "-inf".to_string(),
    };

    if mode.is_pretty() {
        pretty_section(w, &format!("{} paths from {}", summary.kind, summary.source))?;
        pretty_kv(
            w,
            "Reachable",
            format!("{}/{}", summary.reachable, summary.vertex_count),
        )?;
        if let Some(avg) = summary.average_distance {
            pretty_kv(w, "Average distance", format!("{avg:.2}"))?;
        }
        if !summary.critical_path.is_empty() {
            pretty_kv(w, "Critical path", format!("{:?}", summary.critical_path))?;
            pretty_kv(w, "Critical length", summary.critical_path_length.to_string())?;
        }
        writeln!(w)?;
        for v in &payload.distances {
            let parent = v.parent.map_or_else(|| "-".to_string(), |p| p.to_string());
            writeln!(
                w,
                "  {:>4}  dist {:>6}  via {parent}",
                v.vertex,
                fmt_distance(v.distance)
            )?;
        }
        writeln!(w)?;
    } else {
        for v in &payload.distances {
            writeln!(w, "{} {}", v.vertex, fmt_distance(v.distance))?;
        }
        if !summary.critical_path.is_empty() {
            let path: Vec<String> = summary.critical_path.iter().map(ToString::to_string).collect();
            writeln!(
                w,
                "critical_path: {} length={}",
                path.join(" "),
                summary.critical_path_length
            )?;
        }
    }
    write_metrics(w, mode, &payload.metrics)
}
