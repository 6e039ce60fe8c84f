//! `tg scc`: strongly connected components of one graph file.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use taskgraph_core::{MetricsCollector, MetricsSnapshot, SccStats, find_sccs};

use crate::cmd::{resolve_path, write_metrics};
use crate::loader::load_graph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Args, Debug)]
pub struct SccArgs {
    /// Graph file (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also list the condensation edges.
    #[arg(long)]
    pub condensation: bool,
}

#[derive(Debug, Serialize)]
struct CondensedEdge {
    from: usize,
    to: usize,
    weight: i64,
}

#[derive(Debug, Serialize)]
struct SccOutput {
    vertices: usize,
    components: Vec<Vec<usize>>,
    stats: SccStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    condensation: Option<Vec<CondensedEdge>>,
    metrics: MetricsSnapshot,
}

pub fn run_scc(args: &SccArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let loaded = load_graph(&resolve_path(project_root, &args.file))?;

    let mut metrics = MetricsCollector::new();
    let scc = find_sccs(&loaded.graph, &mut metrics);

    let vertices = loaded.graph.vertex_count();
    let components = scc.components().to_vec();
    let stats = scc.stats();
    let condensation = args.condensation.then(|| {
        scc.into_condensation()
            .edges()
            .map(|e| CondensedEdge {
                from: e.from,
                to: e.to,
                weight: e.weight,
            })
            .collect()
    });

    let payload = SccOutput {
        vertices,
        components,
        stats,
        condensation,
        metrics: metrics.snapshot(),
    };
    render(output, &payload, |p, w| render_scc_human(p, output, w))
}

fn render_scc_human(payload: &SccOutput, mode: OutputMode, w: &mut dyn Write) -> std::io::Result<()> {
    if mode.is_pretty() {
        pretty_section(
            w,
            &format!("Strongly connected components ({})", payload.components.len()),
        )?;
        for (id, members) in payload.components.iter().enumerate() {
            writeln!(w, "  Component {id}: {members:?}")?;
        }
        writeln!(w)?;
        pretty_kv(w, "Largest", payload.stats.largest.to_string())?;
        pretty_kv(w, "Smallest", payload.stats.smallest.to_string())?;
        pretty_kv(w, "Mean size", format!("{:.2}", payload.stats.mean_size))?;
    } else {
        for (id, members) in payload.components.iter().enumerate() {
            let list: Vec<String> = members.iter().map(ToString::to_string).collect();
            writeln!(w, "component {id}: {}", list.join(" "))?;
        }
    }

    if let Some(edges) = &payload.condensation {
        if mode.is_pretty() {
            writeln!(w)?;
            pretty_section(w, "Condensation")?;
        }
        for e in edges {
            writeln!(w, "  {} -> {} ({})", e.from, e.to, e.weight)?;
        }
    }

    if mode.is_pretty() {
        writeln!(w)?;
    }
    write_metrics(w, mode, &payload.metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_components_space_separated() {
        let payload = SccOutput {
            vertices: 3,
            components: vec![vec![2, 1, 0]],
            stats: SccStats {
                component_count: 1,
                largest: 3,
                smallest: 3,
                mean_size: 3.0,
            },
            condensation: None,
            metrics: MetricsSnapshot::default(),
        };

        let mut out = Vec::new();
        render_scc_human(&payload, OutputMode::Text, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("component 0: 2 1 0\n"));
        assert!(text.contains("metrics dfs=0"));
    }
}
