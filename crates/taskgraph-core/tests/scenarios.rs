//! Known-topology regression tests for the analysis pipeline.
//!
//! Each test uses a hand-crafted graph whose components, orders and
//! distances were worked out by hand and hardcoded.

use taskgraph_core::{
    Distance, Graph, GraphError, MetricsCollector, NoopMetrics, WeightModel, dfs_sort,
    find_longest_paths, find_sccs, find_shortest_paths, kahn_sort, overall_critical_path,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_graph(n: usize, edges: &[(usize, usize, i64)]) -> Graph {
    let mut g = Graph::new(n, true);
    for &(u, v, w) in edges {
        g.add_edge(u, v, w).expect("edge in range");
    }
    g
}

/// Project schedule used across several tests.
fn project_dag() -> Graph {
    build_graph(
        6,
        &[
            (0, 1, 3),
            (0, 2, 2),
            (1, 3, 4),
            (2, 3, 1),
            (3, 4, 2),
            (3, 5, 3),
            (4, 5, 1),
        ],
    )
}

/// Two cycles joined by a bridge, plus a tail:
/// {0,1,2} → {3,4} → 5
fn two_cycles_with_tail() -> Graph {
    build_graph(
        6,
        &[
            (0, 1, 1),
            (1, 2, 1),
            (2, 0, 1),
            (2, 3, 5),
            (1, 3, 9),
            (3, 4, 2),
            (4, 3, 2),
            (4, 5, 7),
        ],
    )
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn project_dag_critical_path() {
    let g = project_dag();
    let result = find_longest_paths(&g, 0, &mut MetricsCollector::new()).expect("dag");

    assert_eq!(result.critical_path_length(), 10);
    assert_eq!(result.critical_path(), &[0, 1, 3, 5]);
}

#[test]
fn project_dag_is_already_condensed() {
    let g = project_dag();
    let scc = find_sccs(&g, &mut NoopMetrics);

    assert_eq!(scc.component_count(), 6);
    assert!(!scc.has_cycles());
    assert_eq!(scc.condensation().edge_count(), 7);
}

#[test]
fn three_cycle_is_one_component() {
    let g = build_graph(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]);
    let scc = find_sccs(&g, &mut NoopMetrics);

    assert_eq!(scc.component_count(), 1);
    let mut members = scc.components()[0].clone();
    members.sort_unstable();
    assert_eq!(members, vec![0, 1, 2]);

    let topo = kahn_sort(&g, &mut NoopMetrics);
    assert!(!topo.is_dag());
    assert!(topo.order().len() < 3);
}

#[test]
fn single_isolated_vertex() {
    let g = Graph::new(1, true);

    assert_eq!(find_sccs(&g, &mut NoopMetrics).component_count(), 1);

    let shortest = find_shortest_paths(&g, 0, &mut NoopMetrics).expect("dag");
    let longest = find_longest_paths(&g, 0, &mut NoopMetrics).expect("dag");
    for result in [&shortest, &longest] {
        assert_eq!(result.distance(0).expect("in range"), Distance::Finite(0));
        assert_eq!(result.reachable_vertices(), vec![0]);
    }
}

#[test]
fn algorithms_are_idempotent() {
    let g = two_cycles_with_tail();

    assert_eq!(
        find_sccs(&g, &mut MetricsCollector::new()),
        find_sccs(&g, &mut MetricsCollector::new())
    );
    assert_eq!(
        kahn_sort(&g, &mut MetricsCollector::new()),
        kahn_sort(&g, &mut MetricsCollector::new())
    );
    assert_eq!(
        dfs_sort(&g, &mut MetricsCollector::new()),
        dfs_sort(&g, &mut MetricsCollector::new())
    );

    let dag = project_dag();
    assert_eq!(
        find_longest_paths(&dag, 0, &mut MetricsCollector::new()).expect("dag"),
        find_longest_paths(&dag, 0, &mut MetricsCollector::new()).expect("dag")
    );
}

// ---------------------------------------------------------------------------
// Full pipeline on a cyclic graph
// ---------------------------------------------------------------------------

#[test]
fn cyclic_graph_runs_through_condensation() {
    let g = two_cycles_with_tail();
    assert!(matches!(
        find_longest_paths(&g, 0, &mut NoopMetrics),
        Err(GraphError::NotADag { .. })
    ));

    let scc = find_sccs(&g, &mut NoopMetrics);
    assert_eq!(scc.component_count(), 3);
    assert!(scc.same_component(0, 2).expect("in range"));
    assert!(scc.same_component(3, 4).expect("in range"));
    assert!(!scc.same_component(4, 5).expect("in range"));

    // Tarjan closes the tail first: 5, then {3,4}, then {0,1,2}.
    let c_tail = scc.component_of(5).expect("in range");
    let c_mid = scc.component_of(3).expect("in range");
    let c_head = scc.component_of(0).expect("in range");
    assert_eq!((c_tail, c_mid, c_head), (0, 1, 2));

    let dag = scc.condensation();
    assert_eq!(dag.edge_count(), 2);
    // 1 → 3 (weight 9) is scanned before 2 → 3 (weight 5).
    let bridge = dag.neighbors(c_head).expect("in range");
    assert_eq!(bridge.len(), 1);
    assert_eq!(bridge[0].weight, 9);

    let topo = kahn_sort(dag, &mut NoopMetrics);
    assert!(topo.is_dag());
    assert_eq!(topo.order(), &[c_head, c_mid, c_tail]);

    let longest = find_longest_paths(dag, c_head, &mut NoopMetrics).expect("dag");
    assert_eq!(longest.critical_path(), &[c_head, c_mid, c_tail]);
    assert_eq!(longest.critical_path_length(), 16);

    let tasks = topo.expand_components(&scc).expect("dag order");
    assert_eq!(tasks.len(), 6);
    assert_eq!(tasks.last(), Some(&5));
}

#[test]
fn condensation_keeps_weight_model() {
    let mut g = Graph::with_weight_model(2, true, WeightModel::Node);
    g.add_edge(0, 1, 1).expect("edge");
    g.add_edge(1, 0, 1).expect("edge");

    let scc = find_sccs(&g, &mut NoopMetrics);
    assert_eq!(scc.condensation().weight_model(), WeightModel::Node);
    assert_eq!(scc.condensation().vertex_count(), 1);
}

#[test]
fn overall_critical_path_on_project_dag() {
    let g = project_dag();
    let best = overall_critical_path(&g, &mut NoopMetrics)
        .expect("dag")
        .expect("non-empty");

    assert_eq!(best.source(), 0);
    assert_eq!(best.critical_path_length(), 10);
}

#[test]
fn metrics_snapshots_merge_across_runs() {
    let g = project_dag();

    let mut scc_metrics = MetricsCollector::new();
    let _ = find_sccs(&g, &mut scc_metrics);
    let mut path_metrics = MetricsCollector::new();
    let _ = find_shortest_paths(&g, 0, &mut path_metrics).expect("dag");

    let mut total = scc_metrics.snapshot();
    total.merge(&path_metrics.snapshot());

    assert_eq!(total.dfs_visits, 6);
    assert_eq!(total.edge_traversals, 14 + 21);
    assert_eq!(total.relaxations, 7);
}

#[test]
fn out_of_range_vertices_are_rejected() {
    let g = project_dag();
    let scc = find_sccs(&g, &mut NoopMetrics);

    assert!(matches!(
        scc.component_vertices(6),
        Err(GraphError::InvalidComponent { component: 6, component_count: 6 })
    ));
    assert!(matches!(
        find_shortest_paths(&g, 9, &mut NoopMetrics),
        Err(GraphError::OutOfRange { vertex: 9, vertex_count: 6 })
    ));
}
