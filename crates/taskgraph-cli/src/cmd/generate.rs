//! `tg generate`: write the nine seeded datasets.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::cmd::resolve_path;
use crate::config::GenerateConfig;
use crate::datasets::{DATASETS, GraphGenerator};
use crate::loader::{GraphFile, save_graph};
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Directory to write datasets into [config: generate.out_dir].
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// RNG seed [config: generate.seed].
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDataset {
    pub name: String,
    pub path: String,
    pub vertices: usize,
    pub edges: usize,
    pub density: f64,
    pub cyclic: bool,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    seed: u64,
    out_dir: String,
    datasets: Vec<GeneratedDataset>,
}

pub fn run_generate(
    args: &GenerateArgs,
    config: &GenerateConfig,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or(config.seed);
    let out_dir = resolve_path(project_root, args.out_dir.as_ref().unwrap_or(&config.out_dir));

    let datasets = write_catalogue(&out_dir, seed)?;
    let payload = GenerateOutput {
        seed,
        out_dir: out_dir.display().to_string(),
        datasets,
    };

    render(output, &payload, |report, w| {
        render_generate_human(report, output, w)
    })
}

/// Generate every dataset into `out_dir` with source vertex 0.
pub fn write_catalogue(out_dir: &Path, seed: u64) -> anyhow::Result<Vec<GeneratedDataset>> {
    let mut generator = GraphGenerator::new(seed);
    let mut written = Vec::with_capacity(DATASETS.len());

    for spec in &DATASETS {
        let graph = generator.generate(spec);
        let path = out_dir.join(spec.file_name());
        save_graph(&path, &GraphFile::from_graph(&graph, Some(0)))?;

        let vertices = graph.vertex_count();
        let edges = graph.edge_count();
        #[allow(clippy::cast_precision_loss)]
        let density = if vertices == 0 {
            0.0
        } else {
            edges as f64 / vertices as f64
        };
        info!(dataset = spec.name, vertices, edges, "dataset written");

        written.push(GeneratedDataset {
            name: spec.file_name(),
            path: path.display().to_string(),
            vertices,
            edges,
            density,
            cyclic: spec.cyclic,
        });
    }

    Ok(written)
}

fn render_generate_human(
    report: &GenerateOutput,
    mode: OutputMode,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if mode.is_pretty() {
        pretty_section(w, &format!("Generated {} datasets", report.datasets.len()))?;
        pretty_kv(w, "Seed", report.seed.to_string())?;
        pretty_kv(w, "Directory", &report.out_dir)?;
        writeln!(w)?;
        for d in &report.datasets {
            let shape = if d.cyclic { "cyclic" } else { "dag" };
            writeln!(
                w,
                "  {:<14} {:>3} vertices {:>4} edges  density {:.2}  {shape}",
                d.name, d.vertices, d.edges, d.density
            )?;
        }
    } else {
        for d in &report.datasets {
            writeln!(
                w,
                "{} vertices={} edges={} density={:.2} cyclic={}",
                d.name, d.vertices, d.edges, d.density, d.cyclic
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_graph;
    use tempfile::TempDir;

    #[test]
    fn catalogue_files_round_trip_through_loader() {
        let dir = TempDir::new().expect("tempdir");
        let written = write_catalogue(dir.path(), 42).expect("generate");
        assert_eq!(written.len(), 9);

        for dataset in &written {
            let loaded = load_graph(Path::new(&dataset.path)).expect("load");
            assert_eq!(loaded.graph.vertex_count(), dataset.vertices);
            assert_eq!(loaded.graph.edge_count(), dataset.edges);
            assert_eq!(loaded.source, Some(0));
        }
    }

    #[test]
    fn text_output_lists_each_dataset() {
        let report = GenerateOutput {
            seed: 1,
            out_dir: "data".to_string(),
            datasets: vec![GeneratedDataset {
                name: "small_1.json".to_string(),
                path: "data/small_1.json".to_string(),
                vertices: 6,
                edges: 9,
                density: 1.5,
                cyclic: true,
            }],
        };
        let mut out = Vec::new();
        render_generate_human(&report, OutputMode::Text, &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "small_1.json vertices=6 edges=9 density=1.50 cyclic=true\n"
        );
    }
}
