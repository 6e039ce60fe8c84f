//! `tg topo`: topological order of one graph file.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde::Serialize;
use taskgraph_core::{
    Graph, MetricsCollector, MetricsSnapshot, NoopMetrics, TopoResult, dfs_sort, find_sccs,
    kahn_sort,
};

use crate::cmd::{report_graph_error, resolve_path, write_metrics};
use crate::loader::load_graph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// In-degree reduction with a FIFO queue.
    #[default]
    Kahn,
    /// Reversed depth-first post-order.
    Dfs,
}

#[derive(Args, Debug)]
pub struct TopoArgs {
    /// Graph file (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = Method::Kahn)]
    pub method: Method,

    /// Order the SCC condensation and expand it back to task ids.
    #[arg(long)]
    pub condense: bool,
}

#[derive(Debug, Serialize)]
struct TopoOutput {
    method: Method,
    condensed: bool,
    is_dag: bool,
    order: Vec<usize>,
    metrics: MetricsSnapshot,
}

fn sort(graph: &Graph, method: Method, metrics: &mut MetricsCollector) -> TopoResult {
    match method {
        Method::Kahn => kahn_sort(graph, metrics),
        Method::Dfs => dfs_sort(graph, metrics),
    }
}

pub fn run_topo(args: &TopoArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let loaded = load_graph(&resolve_path(project_root, &args.file))?;
    let mut metrics = MetricsCollector::new();

    let (is_dag, order) = if args.condense {
        let scc = find_sccs(&loaded.graph, &mut NoopMetrics);
        let topo = sort(scc.condensation(), args.method, &mut metrics);
        let tasks = topo
            .expand_components(&scc)
            .map_err(|e| report_graph_error(output, &e))?;
        (topo.is_dag(), tasks)
    } else {
        let topo = sort(&loaded.graph, args.method, &mut metrics);
        (topo.is_dag(), topo.order().to_vec())
    };

    let payload = TopoOutput {
        method: args.method,
        condensed: args.condense,
        is_dag,
        order,
        metrics: metrics.snapshot(),
    };
    render(output, &payload, |p, w| render_topo_human(p, output, w))
}

fn render_topo_human(payload: &TopoOutput, mode: OutputMode, w: &mut dyn Write) -> std::io::Result<()> {
    let order: Vec<String> = payload.order.iter().map(ToString::to_string).collect();
    if mode.is_pretty() {
        pretty_section(w, "Topological order")?;
        pretty_kv(w, "Valid DAG", payload.is_dag.to_string())?;
        pretty_kv(w, "Order", order.join(" "))?;
        if !payload.is_dag {
            writeln!(w, "  Graph has a cycle; rerun with --condense to order its components.")?;
        }
        writeln!(w)?;
    } else {
        writeln!(w, "is_dag={}", payload.is_dag)?;
        writeln!(w, "order: {}", order.join(" "))?;
    }
    write_metrics(w, mode, &payload.metrics)
}
