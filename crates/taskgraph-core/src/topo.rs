//! Topological ordering with cycle detection.
//!
//! Two strategies are provided:
//!
//! - [`kahn_sort`]: in-degree reduction with a strict FIFO queue seeded in
//!   vertex order. Deterministic for a fixed graph. On a cyclic graph the
//!   prefix of vertices that could be resolved is kept as the output.
//! - [`dfs_sort`]: reversed DFS post-order with an explicit "on the current
//!   path" marker for back-edge detection. On a cyclic graph the order is
//!   empty.
//!
//! Both report `is_dag == false` for exactly the same graphs, and on a DAG
//! both produce valid (not necessarily identical) orders.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::metrics::Metrics;
use crate::scc::SccResult;

// ---------------------------------------------------------------------------
// TopoResult
// ---------------------------------------------------------------------------

/// Linear order of vertices plus the DAG verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoResult {
    order: Vec<usize>,
    is_dag: bool,
}

impl TopoResult {
    /// The order produced. A permutation of all vertices iff [`Self::is_dag`].
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub const fn is_dag(&self) -> bool {
        self.is_dag
    }

    /// Position of `vertex` in the order, if it was placed.
    #[must_use]
    pub fn position_of(&self, vertex: usize) -> Option<usize> {
        self.order.iter().position(|&v| v == vertex)
    }

    /// Check that every vertex of `graph` is placed exactly once and every
    /// edge points forward in the order.
    #[must_use]
    pub fn is_valid_order(&self, graph: &Graph) -> bool {
        let n = graph.vertex_count();
        if self.order.len() != n {
            return false;
        }

        let mut position = vec![usize::MAX; n];
        for (i, &v) in self.order.iter().enumerate() {
            match position.get_mut(v) {
                Some(slot) if *slot == usize::MAX => *slot = i,
                _ => return false,
            }
        }

        graph.edges().all(|e| position[e.from] < position[e.to])
    }

    /// Expand an order over condensation vertices into original vertex ids,
    /// listing each component's members in place of the component.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NotADag`] if this order is only a partial prefix.
    /// - [`GraphError::InvalidComponent`] if the order names a component
    ///   that `scc` does not have.
    pub fn expand_components(&self, scc: &SccResult) -> Result<Vec<usize>> {
        if !self.is_dag {
            return Err(GraphError::NotADag {
                ordered: self.order.len(),
                vertex_count: scc.component_count(),
            });
        }

        let mut tasks = Vec::with_capacity(scc.vertex_to_component().len());
        for &component in &self.order {
            tasks.extend_from_slice(scc.component_vertices(component)?);
        }
        Ok(tasks)
    }
}

impl fmt::Display for TopoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Topological Order: {:?} (Valid DAG: {})",
            self.order, self.is_dag
        )
    }
}

// ---------------------------------------------------------------------------
// Kahn
// ---------------------------------------------------------------------------

/// Kahn's algorithm.
///
/// Edge traversals are recorded twice per edge (in-degree scan and
/// reduction); queue operations once per enqueue and once per dequeue.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn kahn_sort<M>(graph: &Graph, metrics: &mut M) -> TopoResult
where
    M: Metrics + ?Sized,
{
    metrics.start_timer();
    let result = kahn_order(graph, metrics);
    metrics.stop_timer();

    debug!(
        ordered = result.order.len(),
        is_dag = result.is_dag,
        "kahn sort complete"
    );
    result
}

/// Timer-free Kahn pass shared with the path algorithms.
pub(crate) fn kahn_order<M>(graph: &Graph, metrics: &mut M) -> TopoResult
where
    M: Metrics + ?Sized,
{
    let n = graph.vertex_count();
    let mut in_degree = vec![0_usize; n];

    for edge in graph.edges() {
        metrics.record_edge_traversal();
        in_degree[edge.to] += 1;
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    for (v, &degree) in in_degree.iter().enumerate() {
        if degree == 0 {
            queue.push_back(v);
            metrics.record_queue_operation();
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        metrics.record_queue_operation();
        order.push(u);

        for edge in graph.adjacent(u) {
            metrics.record_edge_traversal();
            in_degree[edge.to] -= 1;
            if in_degree[edge.to] == 0 {
                queue.push_back(edge.to);
                metrics.record_queue_operation();
            }
        }
    }

    let is_dag = order.len() == n;
    TopoResult { order, is_dag }
}

// ---------------------------------------------------------------------------
// DFS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// DFS post-order reversal.
///
/// Records one DFS visit per vertex entered and one edge traversal per edge
/// examined. Stops at the first back edge and returns an empty order.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn dfs_sort<M>(graph: &Graph, metrics: &mut M) -> TopoResult
where
    M: Metrics + ?Sized,
{
    metrics.start_timer();

    let n = graph.vertex_count();
    let mut marks = vec![Mark::Unvisited; n];
    let mut post_order = Vec::with_capacity(n);
    // (vertex, next edge position)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        metrics.record_dfs_visit();
        marks[root] = Mark::OnPath;
        stack.push((root, 0));

        while let Some((v, next_edge)) = stack.last_mut() {
            let v = *v;
            let Some(w) = graph.adjacent(v).get(*next_edge).map(|e| e.to) else {
                stack.pop();
                marks[v] = Mark::Done;
                post_order.push(v);
                continue;
            };
            *next_edge += 1;
            metrics.record_edge_traversal();

            match marks[w] {
                Mark::Unvisited => {
                    metrics.record_dfs_visit();
                    marks[w] = Mark::OnPath;
                    stack.push((w, 0));
                }
                Mark::OnPath => {
                    metrics.stop_timer();
                    debug!(back_edge_from = v, back_edge_to = w, "dfs sort found cycle");
                    return TopoResult {
                        order: Vec::new(),
                        is_dag: false,
                    };
                }
                Mark::Done => {}
            }
        }
    }

    metrics.stop_timer();
    post_order.reverse();
    debug!(ordered = post_order.len(), "dfs sort complete");
    TopoResult {
        order: post_order,
        is_dag: true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsCollector, NoopMetrics};
    use crate::scc::find_sccs;

    fn graph_with_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n, true);
        for &(u, v) in edges {
            g.add_edge(u, v, 1).expect("edge in range");
        }
        g
    }

    #[test]
    fn kahn_orders_simple_dag_deterministically() {
        let g = graph_with_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let result = kahn_sort(&g, &mut NoopMetrics);

        assert!(result.is_dag());
        assert_eq!(result.order(), &[0, 1, 2, 3]);
        assert!(result.is_valid_order(&g));
    }

    #[test]
    fn kahn_seeds_in_vertex_order() {
        // Three independent sources; ties resolve by index.
        let g = graph_with_edges(4, &[(2, 3), (0, 3), (1, 3)]);
        let result = kahn_sort(&g, &mut NoopMetrics);
        assert_eq!(result.order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn kahn_keeps_prefix_on_cycle() {
        // 0 → 1 → 2 → 1: only 0 can be resolved.
        let g = graph_with_edges(3, &[(0, 1), (1, 2), (2, 1)]);
        let result = kahn_sort(&g, &mut NoopMetrics);

        assert!(!result.is_dag());
        assert_eq!(result.order(), &[0]);
        assert!(!result.is_valid_order(&g));
    }

    #[test]
    fn kahn_reports_three_cycle() {
        let g = graph_with_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        let result = kahn_sort(&g, &mut NoopMetrics);
        assert!(!result.is_dag());
        assert!(result.order().len() < 3);
    }

    #[test]
    fn kahn_metrics_count_edges_twice() {
        let g = graph_with_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let mut metrics = MetricsCollector::new();
        let _ = kahn_sort(&g, &mut metrics);

        assert_eq!(metrics.edge_traversals(), 8);
        // 4 enqueues + 4 dequeues
        assert_eq!(metrics.queue_operations(), 8);
        assert_eq!(metrics.dfs_visits(), 0);
    }

    #[test]
    fn empty_graph_is_trivially_a_dag() {
        let g = Graph::new(0, true);
        assert!(kahn_sort(&g, &mut NoopMetrics).is_dag());
        assert!(dfs_sort(&g, &mut NoopMetrics).is_dag());
    }

    #[test]
    fn dfs_sort_produces_valid_order() {
        let g = graph_with_edges(6, &[(5, 2), (5, 0), (4, 0), (4, 1), (2, 3), (3, 1)]);
        let result = dfs_sort(&g, &mut NoopMetrics);

        assert!(result.is_dag());
        assert!(result.is_valid_order(&g));
    }

    #[test]
    fn dfs_sort_detects_cycle_with_empty_order() {
        let g = graph_with_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 1)]);
        let result = dfs_sort(&g, &mut NoopMetrics);

        assert!(!result.is_dag());
        assert!(result.order().is_empty());
    }

    #[test]
    fn dfs_sort_treats_self_loop_as_cycle() {
        let g = graph_with_edges(1, &[(0, 0)]);
        assert!(!dfs_sort(&g, &mut NoopMetrics).is_dag());
        assert!(!kahn_sort(&g, &mut NoopMetrics).is_dag());
    }

    #[test]
    fn dfs_sort_metrics() {
        let g = graph_with_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let mut metrics = MetricsCollector::new();
        let _ = dfs_sort(&g, &mut metrics);

        assert_eq!(metrics.dfs_visits(), 3);
        assert_eq!(metrics.edge_traversals(), 3);
    }

    #[test]
    fn undirected_edge_is_a_cycle() {
        let mut g = Graph::new(2, false);
        g.add_edge(0, 1, 1).expect("edge");
        assert!(!kahn_sort(&g, &mut NoopMetrics).is_dag());
        assert!(!dfs_sort(&g, &mut NoopMetrics).is_dag());
    }

    #[test]
    fn position_lookup() {
        let g = graph_with_edges(3, &[(2, 1), (1, 0)]);
        let result = kahn_sort(&g, &mut NoopMetrics);

        assert_eq!(result.order(), &[2, 1, 0]);
        assert_eq!(result.position_of(2), Some(0));
        assert_eq!(result.position_of(0), Some(2));
        assert_eq!(result.position_of(7), None);
    }

    #[test]
    fn expand_components_maps_back_to_tasks() {
        // {0,1} cycle → 2
        let g = graph_with_edges(3, &[(0, 1), (1, 0), (1, 2)]);
        let scc = find_sccs(&g, &mut NoopMetrics);
        let topo = kahn_sort(scc.condensation(), &mut NoopMetrics);
        assert!(topo.is_dag());

        let tasks = topo.expand_components(&scc).expect("dag order");
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks.last(), Some(&2));
    }

    #[test]
    fn expand_components_rejects_partial_order() {
        let g = graph_with_edges(2, &[(0, 1), (1, 0)]);
        let scc = find_sccs(&g, &mut NoopMetrics);
        let topo = kahn_sort(&g, &mut NoopMetrics);

        assert!(matches!(
            topo.expand_components(&scc),
            Err(GraphError::NotADag { ordered: 0, .. })
        ));
    }

    #[test]
    fn display_shows_verdict() {
        let g = graph_with_edges(2, &[(0, 1)]);
        let text = kahn_sort(&g, &mut NoopMetrics).to_string();
        assert_eq!(text, "Topological Order: [0, 1] (Valid DAG: true)");
    }
}
