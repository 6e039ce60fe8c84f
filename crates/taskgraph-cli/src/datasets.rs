//! Seeded synthetic task graphs.
//!
//! Two shapes are produced:
//!
//! - **cyclic**: one or two small planted cycles, a handful of edges from
//!   the first half of the vertices into the second half, then random
//!   non-duplicate edges until the edge target is met.
//! - **layered DAG**: vertices are dropped into random layers, every vertex
//!   gets one edge into the next layer, then extra edges are added that
//!   respect the `(layer, index)` rank so the result stays acyclic.
//!
//! Weights are uniform in `1..=10`. One RNG is threaded through the whole
//! catalogue, so a seed reproduces all nine files.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use taskgraph_core::Graph;

/// Shape and size of one generated dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub vertices: usize,
    pub edge_factor: f64,
    pub cyclic: bool,
}

pub const DATASETS: [DatasetSpec; 9] = [
    DatasetSpec { name: "small_1", vertices: 6, edge_factor: 1.5, cyclic: true },
    DatasetSpec { name: "small_2", vertices: 8, edge_factor: 1.8, cyclic: false },
    DatasetSpec { name: "small_3", vertices: 10, edge_factor: 2.0, cyclic: true },
    DatasetSpec { name: "medium_1", vertices: 12, edge_factor: 2.2, cyclic: true },
    DatasetSpec { name: "medium_2", vertices: 15, edge_factor: 2.5, cyclic: true },
    DatasetSpec { name: "medium_3", vertices: 20, edge_factor: 2.8, cyclic: false },
    DatasetSpec { name: "large_1", vertices: 25, edge_factor: 3.0, cyclic: true },
    DatasetSpec { name: "large_2", vertices: 35, edge_factor: 3.5, cyclic: true },
    DatasetSpec { name: "large_3", vertices: 50, edge_factor: 4.0, cyclic: false },
];

impl DatasetSpec {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn scaled_edges(&self) -> usize {
        (self.vertices as f64 * self.edge_factor) as usize
    }
}

pub struct GraphGenerator {
    rng: StdRng,
}

impl GraphGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, spec: &DatasetSpec) -> Graph {
        let n = spec.vertices;
        let mut graph = Graph::new(n, true);
        if n < 2 {
            return graph;
        }

        if spec.cyclic {
            self.fill_cyclic(&mut graph, spec.scaled_edges().max(n));
        } else {
            self.fill_layered_dag(&mut graph, spec.scaled_edges().max(n - 1));
        }
        graph
    }

    fn weight(&mut self) -> i64 {
        self.rng.gen_range(1..=10)
    }

    fn add_if_new(&mut self, graph: &mut Graph, u: usize, v: usize) -> bool {
        if u == v || graph.has_edge(u, v) {
            return false;
        }
        let w = self.weight();
        graph.add_edge(u, v, w).is_ok()
    }

    fn fill_cyclic(&mut self, graph: &mut Graph, target: usize) {
        let n = graph.vertex_count();

        self.plant_cycle(graph, 0, n / 3);
        if n >= 6 {
            self.plant_cycle(graph, n / 3, 2 * n / 3);
        }

        let half = n / 2;
        for _ in 0..(n / 4).max(1) {
            let u = self.rng.gen_range(0..half);
            let v = self.rng.gen_range(half..n);
            self.add_if_new(graph, u, v);
        }

        let max_attempts = n * n * 2;
        let mut attempts = 0;
        while graph.edge_count() < target && attempts < max_attempts {
            let u = self.rng.gen_range(0..n);
            let v = self.rng.gen_range(0..n);
            self.add_if_new(graph, u, v);
            attempts += 1;
        }
    }

    /// Ring through up to five distinct vertices of `start..end`.
    fn plant_cycle(&mut self, graph: &mut Graph, start: usize, end: usize) {
        let span = end.saturating_sub(start);
        if span < 2 {
            return;
        }

        let size = (2 + span / 2).min(5).min(span);
        let mut pool: Vec<usize> = (start..end).collect();
        pool.shuffle(&mut self.rng);
        pool.truncate(size);

        for (i, &u) in pool.iter().enumerate() {
            let v = pool[(i + 1) % size];
            self.add_if_new(graph, u, v);
        }
    }

    fn fill_layered_dag(&mut self, graph: &mut Graph, target: usize) {
        let n = graph.vertex_count();
        let layer_count = (2 + n / 5).min(5);

        let layer_of: Vec<usize> = (0..n)
            .map(|_| self.rng.gen_range(0..layer_count))
            .collect();
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
        for (v, &layer) in layer_of.iter().enumerate() {
            layers[layer].push(v);
        }

        for pair in layers.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if next.is_empty() {
                continue;
            }
            for &u in current {
                let v = next[self.rng.gen_range(0..next.len())];
                self.add_if_new(graph, u, v);
            }
        }

        // Extra edges must go forward in (layer, index) rank.
        let forward = |u: usize, v: usize| (layer_of[u], u) < (layer_of[v], v);

        let max_attempts = n * n;
        let mut attempts = 0;
        while graph.edge_count() < target && attempts < max_attempts {
            let u = self.rng.gen_range(0..n);
            let v = self.rng.gen_range(0..n);
            if forward(u, v) {
                self.add_if_new(graph, u, v);
            }
            attempts += 1;
        }

        let mut ranked: Vec<usize> = (0..n).collect();
        ranked.sort_by_key(|&v| (layer_of[v], v));
        'fill: for (i, &u) in ranked.iter().enumerate() {
            for &v in &ranked[i + 1..] {
                if graph.edge_count() >= target {
                    break 'fill;
                }
                self.add_if_new(graph, u, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskgraph_core::{NoopMetrics, find_sccs, kahn_sort};

    #[test]
    fn same_seed_same_catalogue() {
        let mut a = GraphGenerator::new(42);
        let mut b = GraphGenerator::new(42);
        for spec in &DATASETS {
            assert_eq!(a.generate(spec), b.generate(spec), "{}", spec.name);
        }
    }

    #[test]
    fn dag_datasets_are_acyclic_and_dense_enough() {
        let mut generator = GraphGenerator::new(42);
        for spec in &DATASETS {
            let graph = generator.generate(spec);
            assert_eq!(graph.vertex_count(), spec.vertices);
            if !spec.cyclic {
                assert!(kahn_sort(&graph, &mut NoopMetrics).is_dag(), "{}", spec.name);
                assert!(graph.edge_count() >= spec.vertices - 1, "{}", spec.name);
            }
        }
    }

    #[test]
    fn cyclic_datasets_contain_a_cycle() {
        let mut generator = GraphGenerator::new(42);
        for spec in DATASETS.iter().filter(|s| s.cyclic) {
            let graph = generator.generate(spec);
            assert!(find_sccs(&graph, &mut NoopMetrics).has_cycles(), "{}", spec.name);
        }
    }

    #[test]
    fn no_self_loops_or_duplicates() {
        let mut generator = GraphGenerator::new(7);
        for spec in &DATASETS {
            let graph = generator.generate(spec);
            let mut seen = std::collections::HashSet::new();
            for e in graph.edges() {
                assert_ne!(e.from, e.to);
                assert!(seen.insert((e.from, e.to)));
                assert!((1..=10).contains(&e.weight));
            }
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(DATASETS[0].file_name(), "small_1.json");
        assert_eq!(DATASETS[8].file_name(), "large_3.json");
    }
}
