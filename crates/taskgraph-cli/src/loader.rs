//! JSON graph files.
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 3,
//!   "edges": [{ "u": 0, "v": 1, "w": 4 }],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! `source` is optional; `weight_model` defaults to `"edge"`. Undirected
//! files list each logical edge once.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use taskgraph_core::{Graph, GraphError, WeightModel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: usize,
    pub v: usize,
    pub w: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFile {
    pub directed: bool,
    pub n: usize,
    pub edges: Vec<EdgeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
    #[serde(default)]
    pub weight_model: WeightModel,
}

impl GraphFile {
    /// Serializable form of `graph`.
    pub fn from_graph(graph: &Graph, source: Option<usize>) -> Self {
        let mut edges = Vec::with_capacity(graph.edge_count());
        // An undirected self-loop is stored as two consecutive records.
        let mut loop_pending = false;
        for edge in graph.edges() {
            let keep = if graph.is_directed() || edge.from < edge.to {
                true
            } else if edge.from == edge.to {
                loop_pending = !loop_pending;
                loop_pending
            } else {
                false
            };
            if keep {
                edges.push(EdgeRecord {
                    u: edge.from,
                    v: edge.to,
                    w: edge.weight,
                });
            }
        }

        Self {
            directed: graph.is_directed(),
            n: graph.vertex_count(),
            edges,
            source,
            weight_model: graph.weight_model(),
        }
    }

    /// Build the in-memory graph.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        let mut graph = Graph::with_weight_model(self.n, self.directed, self.weight_model);
        for edge in &self.edges {
            graph.add_edge(edge.u, edge.v, edge.w)?;
        }
        Ok(graph)
    }
}

/// A graph read from disk together with its optional source vertex.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    pub source: Option<usize>,
}

pub fn load_graph(path: &Path) -> Result<LoadedGraph> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file: GraphFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let graph = file
        .to_graph()
        .with_context(|| format!("Invalid graph in {}", path.display()))?;

    Ok(LoadedGraph {
        graph,
        source: file.source,
    })
}

/// Write `file` as pretty JSON, creating parent directories as needed.
pub fn save_graph(path: &Path, file: &GraphFile) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(file)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
