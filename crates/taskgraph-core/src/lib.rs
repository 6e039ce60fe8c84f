#![forbid(unsafe_code)]
//! taskgraph-core library.
//!
//! Analysis of task-dependency graphs: strongly connected components and
//! their condensation, topological ordering, and shortest, longest and
//! critical paths over DAGs. Every algorithm writes work counters and a
//! timer into a caller-supplied [`Metrics`] sink.
//!
//! ## Pipeline
//!
//! ```text
//! Graph (may contain cycles)
//!        ↓  scc::find_sccs()
//! SccResult
//!   └─ condensation: one vertex per component (always a DAG)
//!        ↓  topo::kahn_sort() / topo::dfs_sort()
//! TopoResult (order over components)
//!        ↓  path::find_shortest_paths() / path::find_longest_paths()
//! PathResult (distances, parents, critical path)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use taskgraph_core::{find_longest_paths, find_sccs, Graph, MetricsCollector};
//!
//! let mut g = Graph::new(3, true);
//! g.add_edge(0, 1, 2)?;
//! g.add_edge(1, 2, 5)?;
//!
//! let mut metrics = MetricsCollector::new();
//! let scc = find_sccs(&g, &mut metrics);
//! assert_eq!(scc.component_count(), 3);
//!
//! let paths = find_longest_paths(&g, 0, &mut MetricsCollector::new())?;
//! assert_eq!(paths.critical_path(), &[0, 1, 2]);
//! assert_eq!(paths.critical_path_length(), 7);
//! # Ok::<(), taskgraph_core::GraphError>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return [`error::Result`] with a
//!   [`GraphError`] carrying a stable code.
//! - **Logging**: `tracing` spans on each public algorithm and `debug!`
//!   summaries on completion. Nothing is printed.

pub mod error;
pub mod graph;
pub mod metrics;
pub mod path;
pub mod scc;
pub mod topo;

pub use error::{ErrorCode, GraphError, Result};
pub use graph::{Edge, Graph, WeightModel};
pub use metrics::{Metrics, MetricsCollector, MetricsSnapshot, NoopMetrics};
pub use path::{
    Distance, PathKind, PathResult, PathSummary, find_longest_paths, find_shortest_paths,
    overall_critical_path,
};
pub use scc::{SccResult, SccStats, find_sccs};
pub use topo::{TopoResult, dfs_sort, kahn_sort};
