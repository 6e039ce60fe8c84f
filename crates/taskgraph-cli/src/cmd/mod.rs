pub mod analyze;
pub mod generate;
pub mod path;
pub mod scc;
pub mod topo;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use taskgraph_core::{GraphError, MetricsSnapshot};

use crate::output::{CliError, OutputMode, pretty_kv, render_error};

/// Print a core error with its code and hint, then hand back an
/// `anyhow::Error` for the exit status.
pub fn report_graph_error(output: OutputMode, err: &GraphError) -> anyhow::Error {
    let code = err.code();
    let cli_error = CliError::with_code(err.to_string(), code.code()).suggest(code.hint());
    if let Err(render_err) = render_error(output, &cli_error) {
        return render_err;
    }
    anyhow::anyhow!("{}", code.message())
}

/// Resolve a path relative to the working directory unless it is absolute.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Human rendering of a metrics block.
pub fn write_metrics(w: &mut dyn Write, mode: OutputMode, m: &MetricsSnapshot) -> io::Result<()> {
    if mode.is_pretty() {
        pretty_kv(w, "DFS visits", m.dfs_visits.to_string())?;
        pretty_kv(w, "Edge traversals", m.edge_traversals.to_string())?;
        pretty_kv(w, "Relaxations", m.relaxations.to_string())?;
        pretty_kv(w, "Queue operations", m.queue_operations.to_string())?;
        pretty_kv(w, "Elapsed", format!("{} ns", m.elapsed_nanos))
    } else {
        writeln!(
            w,
            "metrics dfs={} edges={} relax={} queue={} nanos={}",
            m.dfs_visits, m.edge_traversals, m.relaxations, m.queue_operations, m.elapsed_nanos
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_project_root() {
        let root = Path::new("/work");
        assert_eq!(
            resolve_path(root, Path::new("data/a.json")),
            PathBuf::from("/work/data/a.json")
        );
        assert_eq!(
            resolve_path(root, Path::new("/tmp/a.json")),
            PathBuf::from("/tmp/a.json")
        );
    }

    #[test]
    fn text_metrics_are_one_line() {
        let view = MetricsSnapshot {
            dfs_visits: 1,
            edge_traversals: 2,
            relaxations: 3,
            queue_operations: 4,
            elapsed_nanos: 5,
        };
        let mut out = Vec::new();
        write_metrics(&mut out, OutputMode::Text, &view).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "metrics dfs=1 edges=2 relax=3 queue=4 nanos=5\n"
        );
    }
}
