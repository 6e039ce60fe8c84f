use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use taskgraph_core::{
    Graph, MetricsCollector, NoopMetrics, dfs_sort, find_longest_paths, find_sccs,
    find_shortest_paths, kahn_sort,
};

struct Tier {
    name: &'static str,
    vertices: usize,
    edges_per_vertex: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        vertices: 100,
        edges_per_vertex: 3,
    },
    Tier {
        name: "medium",
        vertices: 2_000,
        edges_per_vertex: 4,
    },
    Tier {
        name: "large",
        vertices: 20_000,
        edges_per_vertex: 5,
    },
];

/// Edges only go from lower to higher layers.
fn layered_dag(tier: &Tier, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = tier.vertices;
    let mut g = Graph::new(n, true);
    for u in 0..n.saturating_sub(1) {
        for _ in 0..tier.edges_per_vertex {
            let v = rng.gen_range(u + 1..n);
            let w = rng.gen_range(1..=20);
            g.add_edge(u, v, w).expect("in range");
        }
    }
    g
}

/// Random edges in both directions, so large components form.
fn cyclic_graph(tier: &Tier, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = tier.vertices;
    let mut g = Graph::new(n, true);
    for u in 0..n {
        for _ in 0..tier.edges_per_vertex {
            let v = rng.gen_range(0..n);
            g.add_edge(u, v, rng.gen_range(1..=20)).expect("in range");
        }
    }
    g
}

fn bench_scc(c: &mut Criterion) {
    let mut group = c.benchmark_group("scc");

    for tier in &TIERS {
        let graph = cyclic_graph(tier, 0x5CC_u64 + tier.vertices as u64);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("tarjan", tier.name), &graph, |b, g| {
            b.iter(|| black_box(find_sccs(g, &mut NoopMetrics)));
        });

        group.bench_with_input(
            BenchmarkId::new("tarjan_counted", tier.name),
            &graph,
            |b, g| b.iter(|| black_box(find_sccs(g, &mut MetricsCollector::new()))),
        );
    }

    group.finish();
}

fn bench_topo(c: &mut Criterion) {
    let mut group = c.benchmark_group("topo");

    for tier in &TIERS {
        let graph = layered_dag(tier, 0x70F0_u64 + tier.vertices as u64);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("kahn", tier.name), &graph, |b, g| {
            b.iter(|| black_box(kahn_sort(g, &mut NoopMetrics)));
        });

        group.bench_with_input(BenchmarkId::new("dfs", tier.name), &graph, |b, g| {
            b.iter(|| black_box(dfs_sort(g, &mut NoopMetrics)));
        });
    }

    group.finish();
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");

    for tier in &TIERS {
        let graph = layered_dag(tier, 0xDA6_u64 + tier.vertices as u64);
        group.throughput(Throughput::Elements(graph.edge_count() as u64));

        group.bench_with_input(BenchmarkId::new("shortest", tier.name), &graph, |b, g| {
            b.iter(|| black_box(find_shortest_paths(g, 0, &mut NoopMetrics)));
        });

        group.bench_with_input(BenchmarkId::new("longest", tier.name), &graph, |b, g| {
            b.iter(|| black_box(find_longest_paths(g, 0, &mut NoopMetrics)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scc, bench_topo, bench_paths);
criterion_main!(benches);
