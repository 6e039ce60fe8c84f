//! Longest paths and critical-path selection.
//!
//! # Critical path
//!
//! After a longest-path pass from `source`, the critical path ends at the
//! reachable vertex with the greatest finite distance. The source itself is
//! a candidate (distance 0), so a source that reaches nothing yields the
//! single-vertex path `[source]` of length 0. Ties keep the lowest vertex
//! index, even when the other candidate is the source.
//!
//! [`overall_critical_path`] repeats the pass from every vertex and keeps
//! the first source whose critical length is strictly greater than every
//! earlier one.

use tracing::{debug, instrument};

use super::{Distance, PathKind, PathResult, single_source, timed_pass, trace_back};
use crate::error::Result;
use crate::graph::Graph;
use crate::metrics::Metrics;

/// Single-source longest paths over `dag`, with the critical path filled in.
///
/// # Errors
///
/// - [`GraphError::OutOfRange`](crate::GraphError::OutOfRange) if `source`
///   is not a vertex.
/// - [`GraphError::NotADag`](crate::GraphError::NotADag) if `dag` has a
///   cycle.
/// - [`GraphError::DistanceOverflow`](crate::GraphError::DistanceOverflow)
///   if a path sum overflows `i64`.
#[instrument(skip_all, fields(vertices = dag.vertex_count(), source = source))]
pub fn find_longest_paths<M>(dag: &Graph, source: usize, metrics: &mut M) -> Result<PathResult>
where
    M: Metrics + ?Sized,
{
    timed_pass(dag, source, PathKind::Longest, metrics)
}

/// Longest critical path over all possible sources.
///
/// Returns `Ok(None)` for an empty graph. The timer brackets the whole
/// search; counters accumulate across every per-source pass.
///
/// # Errors
///
/// Returns [`GraphError::NotADag`](crate::GraphError::NotADag) if `dag` has
/// a cycle.
#[instrument(skip_all, fields(vertices = dag.vertex_count()))]
pub fn overall_critical_path<M>(dag: &Graph, metrics: &mut M) -> Result<Option<PathResult>>
where
    M: Metrics + ?Sized,
{
    metrics.start_timer();
    let best = best_over_sources(dag, metrics);
    metrics.stop_timer();

    let best = best?;
    if let Some(result) = &best {
        debug!(
            source = result.source(),
            length = result.critical_path_length(),
            "overall critical path selected"
        );
    }
    Ok(best)
}

fn best_over_sources<M>(dag: &Graph, metrics: &mut M) -> Result<Option<PathResult>>
where
    M: Metrics + ?Sized,
{
    let mut best: Option<PathResult> = None;
    for source in 0..dag.vertex_count() {
        let candidate = single_source(dag, source, PathKind::Longest, metrics)?;
        let better = best
            .as_ref()
            .is_none_or(|b| candidate.critical_path_length() > b.critical_path_length());
        if better {
            best = Some(candidate);
        }
    }
    Ok(best)
}

/// Pick the farthest reachable vertex and trace the path to it.
pub(super) fn farthest_path(
    distances: &[Distance],
    parents: &[Option<usize>],
    source: usize,
) -> (Vec<usize>, i64) {
    let mut best: Option<(usize, i64)> = None;
    for (v, distance) in distances.iter().enumerate() {
        if let Some(d) = distance.finite()
            && best.is_none_or(|(_, longest)| d > longest)
        {
            best = Some((v, d));
        }
    }

    // The source is always finite, so `best` is only empty for a bad source.
    let (target, longest) = best.unwrap_or((source, 0));
    (trace_back(distances, parents, source, target), longest)
}
