//! Adjacency-list graph model shared by every algorithm.
//!
//! A [`Graph`] has a fixed vertex count chosen at construction. Edges are
//! appended with [`Graph::add_edge`] and never removed. Insertion order
//! inside each adjacency list is preserved: traversal order, work metrics
//! and tie-breaks in the algorithms all depend on it.
//!
//! Undirected graphs store both directions as separate [`Edge`] records, so
//! `edge_count` reports stored records rather than logical edges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

// ---------------------------------------------------------------------------
// Edge / WeightModel
// ---------------------------------------------------------------------------

/// A directed edge record `from → to` with a signed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}({})", self.from, self.to, self.weight)
    }
}

/// Where weights conceptually live.
///
/// Carried through the data model and copied into condensation graphs. The
/// algorithms always read weights from edges regardless of the tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightModel {
    #[default]
    Edge,
    Node,
}

impl WeightModel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Node => "node",
        }
    }
}

impl fmt::Display for WeightModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Fixed-size adjacency-list graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    directed: bool,
    weight_model: WeightModel,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and the default
    /// [`WeightModel::Edge`] tag.
    #[must_use]
    pub fn new(vertex_count: usize, directed: bool) -> Self {
        Self::with_weight_model(vertex_count, directed, WeightModel::default())
    }

    #[must_use]
    pub fn with_weight_model(vertex_count: usize, directed: bool, weight_model: WeightModel) -> Self {
        Self {
            directed,
            weight_model,
            adjacency: vec![Vec::new(); vertex_count],
        }
    }

    /// Append `u → v` with weight `w` (and `v → u` for undirected graphs).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either endpoint is not a vertex.
    /// The graph is left unchanged in that case.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: i64) -> Result<()> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;

        self.adjacency[u].push(Edge {
            from: u,
            to: v,
            weight,
        });
        if !self.directed {
            self.adjacency[v].push(Edge {
                from: v,
                to: u,
                weight,
            });
        }
        Ok(())
    }

    /// Outgoing edge records of `u`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `u` is not a vertex.
    pub fn neighbors(&self, u: usize) -> Result<&[Edge]> {
        self.check_vertex(u)?;
        Ok(&self.adjacency[u])
    }

    /// Whether `from → to` is already stored.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacency
            .get(from)
            .is_some_and(|edges| edges.iter().any(|e| e.to == to))
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of stored edge records.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub const fn weight_model(&self) -> WeightModel {
        self.weight_model
    }

    /// All edge records, vertex by vertex, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.iter().flatten()
    }

    /// Graph with every edge flipped. Undirected graphs are their own reverse.
    #[must_use]
    pub fn reverse(&self) -> Self {
        if !self.directed {
            return self.clone();
        }

        let mut reversed = Self::with_weight_model(self.vertex_count(), true, self.weight_model);
        for edge in self.edges() {
            reversed.adjacency[edge.to].push(Edge {
                from: edge.to,
                to: edge.from,
                weight: edge.weight,
            });
        }
        reversed
    }

    /// Append a record whose endpoints the caller has already validated.
    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.adjacency[edge.from].push(edge);
    }

    /// Adjacency list of a vertex known to be in range.
    pub(crate) fn adjacent(&self, u: usize) -> &[Edge] {
        &self.adjacency[u]
    }

    pub(crate) fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex < self.adjacency.len() {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                vertex,
                vertex_count: self.adjacency.len(),
            })
        }
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Graph (vertices: {}, directed: {}, weight model: {})",
            self.vertex_count(),
            self.directed,
            self.weight_model
        )?;
        for (u, edges) in self.adjacency.iter().enumerate() {
            write!(f, "{u}:")?;
            for edge in edges {
                write!(f, " {edge}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
