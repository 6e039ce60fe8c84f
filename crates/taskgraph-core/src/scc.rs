//! Strongly connected components and the condensation graph.
//!
//! # Algorithm
//!
//! Tarjan's single-pass DFS. Every vertex gets a discovery index and a
//! low-link: the smallest discovery index reachable from it through its DFS
//! subtree plus back edges to vertices still on the component stack. A
//! vertex whose low-link equals its own index roots a component; everything
//! above it on the stack (down to and including it) is popped into a fresh
//! component, in pop order.
//!
//! Roots are tried in vertex order `0..n`, so component ids follow vertex
//! numbering rather than reachability.
//!
//! The DFS runs on an explicit stack of `(vertex, next edge position)`
//! frames, so depth is bounded by heap rather than by the call stack.
//!
//! # Condensation
//!
//! After discovery every edge is scanned once more. The first edge seen for
//! a given `(source component, target component)` pair with differing
//! components becomes the condensation edge and donates its weight; later
//! duplicates are dropped.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph};
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Components, vertex membership, and the condensed DAG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccResult {
    components: Vec<Vec<usize>>,
    vertex_to_component: Vec<usize>,
    condensation: Graph,
}

/// Size summary of an [`SccResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SccStats {
    pub component_count: usize,
    pub largest: usize,
    pub smallest: usize,
    pub mean_size: f64,
}

impl SccResult {
    /// Components in discovery order; a component's id is its index here.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn component_sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }

    /// Component id per vertex, indexed by vertex.
    #[must_use]
    pub fn vertex_to_component(&self) -> &[usize] {
        &self.vertex_to_component
    }

    /// Component id of `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is not a vertex.
    pub fn component_of(&self, vertex: usize) -> Result<usize> {
        self.vertex_to_component
            .get(vertex)
            .copied()
            .ok_or(GraphError::OutOfRange {
                vertex,
                vertex_count: self.vertex_to_component.len(),
            })
    }

    /// Vertices of component `component`, in stack-pop order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidComponent`] for an unknown id.
    pub fn component_vertices(&self, component: usize) -> Result<&[usize]> {
        self.components
            .get(component)
            .map(Vec::as_slice)
            .ok_or(GraphError::InvalidComponent {
                component,
                component_count: self.components.len(),
            })
    }

    /// Whether `u` and `v` are mutually reachable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either is not a vertex.
    pub fn same_component(&self, u: usize, v: usize) -> Result<bool> {
        Ok(self.component_of(u)? == self.component_of(v)?)
    }

    /// The condensed DAG: one vertex per component.
    #[must_use]
    pub const fn condensation(&self) -> &Graph {
        &self.condensation
    }

    #[must_use]
    pub fn into_condensation(self) -> Graph {
        self.condensation
    }

    /// `true` when at least one component has more than one vertex, i.e.
    /// DAG algorithms must run on the condensation instead.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        self.components.len() < self.vertex_to_component.len()
    }

    #[must_use]
    pub fn stats(&self) -> SccStats {
        let sizes = self.component_sizes();
        let count = sizes.len();
        let total: usize = sizes.iter().sum();

        #[allow(clippy::cast_precision_loss)]
        let mean_size = if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        };

        SccStats {
            component_count: count,
            largest: sizes.iter().copied().max().unwrap_or(0),
            smallest: sizes.iter().copied().min().unwrap_or(0),
            mean_size,
        }
    }
}

impl fmt::Display for SccResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Strongly Connected Components ({} components):",
            self.components.len()
        )?;
        for (id, members) in self.components.iter().enumerate() {
            writeln!(f, "  Component {id}: {members:?}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Find all strongly connected components of `graph` and build its
/// condensation.
///
/// Records one DFS visit per vertex and one edge traversal per edge examined,
/// both during discovery and during the condensation scan. The timer covers
/// discovery only.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn find_sccs<M>(graph: &Graph, metrics: &mut M) -> SccResult
where
    M: Metrics + ?Sized,
{
    metrics.start_timer();
    let (components, vertex_to_component) = Tarjan::new(graph).run(metrics);
    metrics.stop_timer();

    let condensation =
        build_condensation(graph, &vertex_to_component, components.len(), metrics);

    debug!(
        components = components.len(),
        condensation_edges = condensation.edge_count(),
        "scc discovery complete"
    );

    SccResult {
        components,
        vertex_to_component,
        condensation,
    }
}

/// One suspended DFS call: the vertex and the next adjacency position to try.
struct Frame {
    vertex: usize,
    next_edge: usize,
}

struct Tarjan<'g> {
    graph: &'g Graph,
    next_index: usize,
    index: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
    component_of: Vec<usize>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g Graph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            next_index: 0,
            index: vec![None; n],
            low_link: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
            component_of: vec![0; n],
        }
    }

    fn run<M>(mut self, metrics: &mut M) -> (Vec<Vec<usize>>, Vec<usize>)
    where
        M: Metrics + ?Sized,
    {
        for root in 0..self.graph.vertex_count() {
            if self.index[root].is_none() {
                self.strong_connect(root, metrics);
            }
        }
        (self.components, self.component_of)
    }

    fn strong_connect<M>(&mut self, root: usize, metrics: &mut M)
    where
        M: Metrics + ?Sized,
    {
        let graph = self.graph;
        let mut call_stack = vec![self.enter(root, metrics)];

        while let Some(frame) = call_stack.last_mut() {
            let v = frame.vertex;

            if let Some(w) = graph.adjacent(v).get(frame.next_edge).map(|e| e.to) {
                frame.next_edge += 1;
                metrics.record_edge_traversal();

                match self.index[w] {
                    None => {
                        let child = self.enter(w, metrics);
                        call_stack.push(child);
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.low_link[v] = self.low_link[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // All edges of v examined: return from its frame.
            call_stack.pop();
            if self.index[v] == Some(self.low_link[v]) {
                self.pop_component(v);
            }
            if let Some(parent) = call_stack.last() {
                let p = parent.vertex;
                self.low_link[p] = self.low_link[p].min(self.low_link[v]);
            }
        }
    }

    fn enter<M>(&mut self, v: usize, metrics: &mut M) -> Frame
    where
        M: Metrics + ?Sized,
    {
        metrics.record_dfs_visit();
        self.index[v] = Some(self.next_index);
        self.low_link[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        Frame {
            vertex: v,
            next_edge: 0,
        }
    }

    fn pop_component(&mut self, root: usize) {
        let id = self.components.len();
        let mut members = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            self.component_of[w] = id;
            members.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(members);
    }
}

fn build_condensation<M>(
    graph: &Graph,
    vertex_to_component: &[usize],
    component_count: usize,
    metrics: &mut M,
) -> Graph
where
    M: Metrics + ?Sized,
{
    let mut condensation = Graph::with_weight_model(component_count, true, graph.weight_model());
    let mut added: HashSet<(usize, usize)> = HashSet::new();

    for edge in graph.edges() {
        metrics.record_edge_traversal();
        let from = vertex_to_component[edge.from];
        let to = vertex_to_component[edge.to];
        if from != to && added.insert((from, to)) {
            condensation.push_edge(Edge {
                from,
                to,
                weight: edge.weight,
            });
        }
    }

    condensation
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
