//! Work counters and a timer that every algorithm writes into.
//!
//! Algorithms take `&mut M where M: Metrics + ?Sized`: the sink is borrowed
//! exclusively for one invocation, so counters need no synchronization.
//! Aggregating several runs is done explicitly with
//! [`MetricsSnapshot::merge`] once each run has finished.
//!
//! # Timer semantics
//!
//! - [`Metrics::elapsed`] is zero before the timer was ever started.
//! - Starting a running timer is a no-op; stopping a stopped one too.
//! - While running, `elapsed` returns the live delta since the start.
//! - Starting again after a stop begins a fresh interval.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Capability interface for algorithm instrumentation.
pub trait Metrics {
    fn record_dfs_visit(&mut self);
    fn record_edge_traversal(&mut self);
    fn record_relaxation(&mut self);
    fn record_queue_operation(&mut self);
    fn start_timer(&mut self);
    fn stop_timer(&mut self);
    fn elapsed(&self) -> Duration;
}

// ---------------------------------------------------------------------------
// MetricsCollector
// ---------------------------------------------------------------------------

/// Counting sink. One instance per algorithm invocation.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    dfs_visits: u64,
    edge_traversals: u64,
    relaxations: u64,
    queue_operations: u64,
    running_since: Option<Instant>,
    last_interval: Duration,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn dfs_visits(&self) -> u64 {
        self.dfs_visits
    }

    #[must_use]
    pub const fn edge_traversals(&self) -> u64 {
        self.edge_traversals
    }

    #[must_use]
    pub const fn relaxations(&self) -> u64 {
        self.relaxations
    }

    #[must_use]
    pub const fn queue_operations(&self) -> u64 {
        self.queue_operations
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Freeze the current counters and elapsed time.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dfs_visits: self.dfs_visits,
            edge_traversals: self.edge_traversals,
            relaxations: self.relaxations,
            queue_operations: self.queue_operations,
            elapsed_nanos: u64::try_from(self.elapsed().as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

impl Metrics for MetricsCollector {
    fn record_dfs_visit(&mut self) {
        self.dfs_visits += 1;
    }

    fn record_edge_traversal(&mut self) {
        self.edge_traversals += 1;
    }

    fn record_relaxation(&mut self) {
        self.relaxations += 1;
    }

    fn record_queue_operation(&mut self) {
        self.queue_operations += 1;
    }

    fn start_timer(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn stop_timer(&mut self) {
        if let Some(started) = self.running_since.take() {
            self.last_interval = started.elapsed();
        }
    }

    fn elapsed(&self) -> Duration {
        self.running_since
            .map_or(self.last_interval, |started| started.elapsed())
    }
}

// ---------------------------------------------------------------------------
// NoopMetrics
// ---------------------------------------------------------------------------

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn record_dfs_visit(&mut self) {}
    fn record_edge_traversal(&mut self) {}
    fn record_relaxation(&mut self) {}
    fn record_queue_operation(&mut self) {}
    fn start_timer(&mut self) {}
    fn stop_timer(&mut self) {}

    fn elapsed(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// MetricsSnapshot
// ---------------------------------------------------------------------------

/// Immutable copy of a finished run's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub dfs_visits: u64,
    pub edge_traversals: u64,
    pub relaxations: u64,
    pub queue_operations: u64,
    pub elapsed_nanos: u64,
}

impl MetricsSnapshot {
    /// Add another completed run's counters and time into this one.
    pub fn merge(&mut self, other: &Self) {
        self.dfs_visits += other.dfs_visits;
        self.edge_traversals += other.edge_traversals;
        self.relaxations += other.relaxations;
        self.queue_operations += other.queue_operations;
        self.elapsed_nanos = self.elapsed_nanos.saturating_add(other.elapsed_nanos);
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos)
    }

    #[must_use]
    pub const fn elapsed_millis(&self) -> u64 {
        self.elapsed_nanos / 1_000_000
    }

    /// Multi-line human report.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "Metrics Report:\n  Execution Time: {} ms\n  DFS Visits: {}\n  Edge Traversals: {}\n  Relaxations: {}\n  Queue Operations: {}",
            self.elapsed_millis(),
            self.dfs_visits,
            self.edge_traversals,
            self.relaxations,
            self.queue_operations
        )
    }

}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dfs={} edges={} relax={} queue={} time={:?}",
            self.dfs_visits,
            self.edge_traversals,
            self.relaxations,
            self.queue_operations,
            self.elapsed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_collector_is_zeroed() {
        let m = MetricsCollector::new();
        assert_eq!(m.snapshot(), MetricsSnapshot::default());
        assert_eq!(m.elapsed(), Duration::ZERO);
        assert!(!m.is_running());
    }

    #[test]
    fn counters_increment_independently() {
        let mut m = MetricsCollector::new();
        m.record_dfs_visit();
        m.record_edge_traversal();
        m.record_edge_traversal();
        m.record_relaxation();
        m.record_queue_operation();
        m.record_queue_operation();
        m.record_queue_operation();

        assert_eq!(m.dfs_visits(), 1);
        assert_eq!(m.edge_traversals(), 2);
        assert_eq!(m.relaxations(), 1);
        assert_eq!(m.queue_operations(), 3);
    }

    #[test]
    fn elapsed_is_live_while_running() {
        let mut m = MetricsCollector::new();
        m.start_timer();
        std::thread::sleep(Duration::from_millis(2));
        let first = m.elapsed();
        assert!(first >= Duration::from_millis(2));
        std::thread::sleep(Duration::from_millis(1));
        assert!(m.elapsed() > first);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut m = MetricsCollector::new();
        m.start_timer();
        std::thread::sleep(Duration::from_millis(3));
        m.start_timer();
        m.stop_timer();
        assert!(m.elapsed() >= Duration::from_millis(3));
    }

    #[test]
    fn stop_freezes_elapsed() {
        let mut m = MetricsCollector::new();
        m.start_timer();
        std::thread::sleep(Duration::from_millis(1));
        m.stop_timer();
        let frozen = m.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(m.elapsed(), frozen);

        m.stop_timer();
        assert_eq!(m.elapsed(), frozen);
    }

    #[test]
    fn noop_metrics_report_nothing() {
        let mut m = NoopMetrics;
        m.start_timer();
        m.record_edge_traversal();
        m.stop_timer();
        assert_eq!(m.elapsed(), Duration::ZERO);
    }

    #[test]
    fn merge_sums_completed_runs() {
        let mut total = MetricsSnapshot {
            dfs_visits: 1,
            edge_traversals: 2,
            relaxations: 3,
            queue_operations: 4,
            elapsed_nanos: 5,
        };
        total.merge(&MetricsSnapshot {
            dfs_visits: 10,
            edge_traversals: 20,
            relaxations: 30,
            queue_operations: 40,
            elapsed_nanos: 50,
        });
        assert_eq!(total.dfs_visits, 11);
        assert_eq!(total.edge_traversals, 22);
        assert_eq!(total.relaxations, 33);
        assert_eq!(total.queue_operations, 44);
        assert_eq!(total.elapsed_nanos, 55);
    }

    #[test]
    fn report_and_json_have_expected_fields() {
        let snap = MetricsSnapshot {
            dfs_visits: 6,
            edge_traversals: 14,
            relaxations: 0,
            queue_operations: 0,
            elapsed_nanos: 3_000_000,
        };
        let report = snap.report();
        assert!(report.contains("Execution Time: 3 ms"));
        assert!(report.contains("DFS Visits: 6"));
        assert!(report.contains("Edge Traversals: 14"));

        let json = serde_json::to_value(snap).expect("json");
        assert_eq!(json["dfs_visits"], 6);
        assert_eq!(json["elapsed_nanos"], 3_000_000);
    }
}
