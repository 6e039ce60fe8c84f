//! Single-source shortest and longest paths over a DAG.
//!
//! # Overview
//!
//! Both directions share one traversal: compute a Kahn order, set
//! `dist[source] = 0` and every other distance to the kind's unreached
//! sentinel, then relax each outgoing edge of every reached vertex in
//! topological order. Because every predecessor of `v` is final before `v`
//! is processed, one pass is enough. Negative weights are fine; there are no
//! cycles to exploit them.
//!
//! [`PathKind`] supplies the two things that differ: the sentinel
//! ([`Distance::PosInfinity`] for shortest, [`Distance::NegInfinity`] for
//! longest) and the improvement comparator (`<` vs `>`).
//!
//! # Metrics
//!
//! The internal Kahn pass contributes its own edge traversals and queue
//! operations. Relaxation then records one edge traversal and one relaxation
//! per edge leaving a reached vertex, whether or not it improves anything.
//!
//! # Errors
//!
//! An out-of-range source is rejected before the timer starts. A cyclic
//! input is rejected with [`GraphError::NotADag`] before relaxation. A path
//! sum outside the `i64` range fails with [`GraphError::DistanceOverflow`]
//! instead of producing a clamped distance.

mod critical;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::metrics::Metrics;
use crate::topo::kahn_order;

pub use critical::{find_longest_paths, overall_critical_path};

// ---------------------------------------------------------------------------
// Distance / PathKind
// ---------------------------------------------------------------------------

/// A path distance, or one of the unreached sentinels.
///
/// Ordered `NegInfinity < Finite(_) < PosInfinity`, with finite values
/// compared numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Distance {
    NegInfinity,
    Finite(i64),
    PosInfinity,
}

impl Distance {
    #[must_use]
    pub const fn finite(self) -> Option<i64> {
        match self {
            Self::Finite(d) => Some(d),
            Self::NegInfinity | Self::PosInfinity => None,
        }
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Extend by an edge weight. Sentinels absorb; `None` when a finite
    /// sum leaves the `i64` range.
    #[must_use]
    pub fn extend(self, weight: i64) -> Option<Self> {
        match self {
            Self::Finite(d) => d.checked_add(weight).map(Self::Finite),
            other => Some(other),
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegInfinity => f.write_str("-inf"),
            Self::Finite(d) => write!(f, "{d}"),
            Self::PosInfinity => f.write_str("inf"),
        }
    }
}

/// Which extreme the relaxation keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PathKind {
    Shortest,
    Longest,
}

impl PathKind {
    /// Distance assigned to vertices the source cannot reach.
    #[must_use]
    pub const fn unreached(self) -> Distance {
        match self {
            Self::Shortest => Distance::PosInfinity,
            Self::Longest => Distance::NegInfinity,
        }
    }

    /// Whether `candidate` should replace `current`.
    #[must_use]
    pub fn improves(self, candidate: Distance, current: Distance) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shortest => "shortest",
            Self::Longest => "longest",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PathResult
// ---------------------------------------------------------------------------

/// Distances and predecessor links from one source.
///
/// Longest-path results also carry the critical path: the path from the
/// source to the reachable vertex with the greatest distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    kind: PathKind,
    source: usize,
    distances: Vec<Distance>,
    parents: Vec<Option<usize>>,
    critical_path: Vec<usize>,
    critical_path_length: i64,
}

/// Serializable digest of a [`PathResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSummary {
    pub kind: PathKind,
    pub source: usize,
    pub reachable: usize,
    pub vertex_count: usize,
    pub average_distance: Option<f64>,
    pub critical_path: Vec<usize>,
    pub critical_path_length: i64,
}

impl PathResult {
    #[must_use]
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    /// Distance of every vertex, indexed by vertex.
    #[must_use]
    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }

    /// Distance to `vertex`; the unreached sentinel if it has no path.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is not a vertex.
    pub fn distance(&self, vertex: usize) -> Result<Distance> {
        self.distances
            .get(vertex)
            .copied()
            .ok_or_else(|| self.out_of_range(vertex))
    }

    /// Predecessor of every vertex on its recorded path; `None` for the
    /// source and unreached vertices.
    #[must_use]
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Predecessor of `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is not a vertex.
    pub fn parent(&self, vertex: usize) -> Result<Option<usize>> {
        self.parents
            .get(vertex)
            .copied()
            .ok_or_else(|| self.out_of_range(vertex))
    }

    /// Whether `vertex` is reachable from the source. Out-of-range vertices
    /// are simply unreachable.
    #[must_use]
    pub fn has_path(&self, vertex: usize) -> bool {
        self.distances.get(vertex).is_some_and(|d| d.is_finite())
    }

    /// Vertices from the source to `target` along parent links. Empty when
    /// `target` is unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `target` is not a vertex.
    pub fn path_to(&self, target: usize) -> Result<Vec<usize>> {
        if target >= self.distances.len() {
            return Err(self.out_of_range(target));
        }
        Ok(trace_back(&self.distances, &self.parents, self.source, target))
    }

    #[must_use]
    pub fn reachable_vertices(&self) -> Vec<usize> {
        (0..self.distances.len())
            .filter(|&v| self.has_path(v))
            .collect()
    }

    /// Empty for shortest-path results.
    #[must_use]
    pub fn critical_path(&self) -> &[usize] {
        &self.critical_path
    }

    /// Zero for shortest-path results.
    #[must_use]
    pub const fn critical_path_length(&self) -> i64 {
        self.critical_path_length
    }

    /// Mean of the finite distances, source included.
    #[must_use]
    pub fn average_distance(&self) -> Option<f64> {
        let finite: Vec<i64> = self.distances.iter().filter_map(|d| d.finite()).collect();
        if finite.is_empty() {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = finite.iter().map(|&d| d as f64).sum::<f64>() / finite.len() as f64;
        Some(mean)
    }

    #[must_use]
    pub fn summary(&self) -> PathSummary {
        PathSummary {
            kind: self.kind,
            source: self.source,
            reachable: self.reachable_vertices().len(),
            vertex_count: self.distances.len(),
            average_distance: self.average_distance(),
            critical_path: self.critical_path.clone(),
            critical_path_length: self.critical_path_length,
        }
    }

    fn out_of_range(&self, vertex: usize) -> GraphError {
        GraphError::OutOfRange {
            vertex,
            vertex_count: self.distances.len(),
        }
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} paths from {}: {}/{} reachable",
            self.kind,
            self.source,
            self.reachable_vertices().len(),
            self.distances.len()
        )?;
        if self.kind == PathKind::Longest && !self.critical_path.is_empty() {
            write!(
                f,
                ", critical path {:?} (length {})",
                self.critical_path, self.critical_path_length
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Single-source shortest paths over `dag`.
///
/// # Errors
///
/// - [`GraphError::OutOfRange`] if `source` is not a vertex.
/// - [`GraphError::NotADag`] if `dag` has a cycle.
/// - [`GraphError::DistanceOverflow`] if a path sum overflows `i64`.
#[instrument(skip_all, fields(vertices = dag.vertex_count(), source = source))]
pub fn find_shortest_paths<M>(dag: &Graph, source: usize, metrics: &mut M) -> Result<PathResult>
where
    M: Metrics + ?Sized,
{
    timed_pass(dag, source, PathKind::Shortest, metrics)
}

/// Validate `source`, then run one timed pass.
fn timed_pass<M>(dag: &Graph, source: usize, kind: PathKind, metrics: &mut M) -> Result<PathResult>
where
    M: Metrics + ?Sized,
{
    dag.check_vertex(source)?;

    metrics.start_timer();
    let result = single_source(dag, source, kind, metrics);
    metrics.stop_timer();

    let result = result?;
    debug!(
        kind = kind.as_str(),
        reachable = result.reachable_vertices().len(),
        critical_path_length = result.critical_path_length,
        "path pass complete"
    );
    Ok(result)
}

/// Timer-free pass: order, relax, and (for longest) pick the critical path.
fn single_source<M>(dag: &Graph, source: usize, kind: PathKind, metrics: &mut M) -> Result<PathResult>
where
    M: Metrics + ?Sized,
{
    let (distances, parents) = relax_in_topological_order(dag, source, kind, metrics)?;

    let (critical_path, critical_path_length) = match kind {
        PathKind::Shortest => (Vec::new(), 0),
        PathKind::Longest => critical::farthest_path(&distances, &parents, source),
    };

    Ok(PathResult {
        kind,
        source,
        distances,
        parents,
        critical_path,
        critical_path_length,
    })
}

/// The shared relaxation loop.
fn relax_in_topological_order<M>(
    dag: &Graph,
    source: usize,
    kind: PathKind,
    metrics: &mut M,
) -> Result<(Vec<Distance>, Vec<Option<usize>>)>
where
    M: Metrics + ?Sized,
{
    let n = dag.vertex_count();
    let topo = kahn_order(dag, metrics);
    if !topo.is_dag() {
        return Err(GraphError::NotADag {
            ordered: topo.order().len(),
            vertex_count: n,
        });
    }

    let mut distances = vec![kind.unreached(); n];
    let mut parents: Vec<Option<usize>> = vec![None; n];
    distances[source] = Distance::Finite(0);

    for &u in topo.order() {
        let from = distances[u];
        if !from.is_finite() {
            continue;
        }

        for edge in dag.adjacent(u) {
            metrics.record_edge_traversal();
            metrics.record_relaxation();

            let candidate = from.extend(edge.weight).ok_or(GraphError::DistanceOverflow {
                from: u,
                to: edge.to,
            })?;
            if kind.improves(candidate, distances[edge.to]) {
                distances[edge.to] = candidate;
                parents[edge.to] = Some(u);
            }
        }
    }

    Ok((distances, parents))
}

/// Walk parent links from `target` back to `source`.
fn trace_back(
    distances: &[Distance],
    parents: &[Option<usize>],
    source: usize,
    target: usize,
) -> Vec<usize> {
    if !distances[target].is_finite() {
        return Vec::new();
    }

    let mut path = vec![target];
    let mut current = target;
    while current != source {
        let Some(prev) = parents[current] else {
            return Vec::new();
        };
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
