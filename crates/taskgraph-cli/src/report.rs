//! Long-format CSV results: one row per (dataset, algorithm, metric).
//!
//! ```text
//! Dataset,Nodes,Edges,Algorithm,Metric,Value,TimeNanos
//! small_1.json,6,9,SCC,DFSVisits,6,41250
//! ```
//!
//! `TimeNanos` repeats the elapsed time of the run that produced the row.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use taskgraph_core::MetricsSnapshot;

pub const HEADER: [&str; 7] = [
    "Dataset",
    "Nodes",
    "Edges",
    "Algorithm",
    "Metric",
    "Value",
    "TimeNanos",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRow {
    pub dataset: String,
    pub nodes: usize,
    pub edges: usize,
    pub algorithm: &'static str,
    pub metric: &'static str,
    pub value: i64,
    pub time_nanos: u64,
}

/// Rows for one algorithm run on one dataset.
pub struct RunRows<'a> {
    pub dataset: &'a str,
    pub nodes: usize,
    pub edges: usize,
    pub algorithm: &'static str,
    pub metrics: MetricsSnapshot,
}

impl RunRows<'_> {
    pub fn row(&self, metric: &'static str, value: i64) -> ReportRow {
        ReportRow {
            dataset: self.dataset.to_string(),
            nodes: self.nodes,
            edges: self.edges,
            algorithm: self.algorithm,
            metric,
            value,
            time_nanos: self.metrics.elapsed_nanos,
        }
    }

    /// Saturating conversion for counters.
    pub fn count(&self, metric: &'static str, value: u64) -> ReportRow {
        self.row(metric, i64::try_from(value).unwrap_or(i64::MAX))
    }
}

pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl ReportWriter<File> {
    /// Create (or truncate) `path`, creating parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        Self::from_writer(file)
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wrap `inner` and write the header immediately, so a run with no
    /// datasets still yields a well-formed file.
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_rows(&mut self, rows: &[ReportRow]) -> Result<()> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.rows += rows.len();
        Ok(())
    }

    pub const fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush report: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> RunRows<'static> {
        RunRows {
            dataset: "small_1.json",
            nodes: 6,
            edges: 9,
            algorithm: "SCC",
            metrics: MetricsSnapshot {
                dfs_visits: 6,
                edge_traversals: 18,
                relaxations: 0,
                queue_operations: 0,
                elapsed_nanos: 41_250,
            },
        }
    }

    #[test]
    fn header_written_even_without_rows() {
        let report = ReportWriter::from_writer(Vec::new()).expect("writer");
        let bytes = report.finish().expect("finish");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "Dataset,Nodes,Edges,Algorithm,Metric,Value,TimeNanos\n"
        );
    }

    #[test]
    fn rows_follow_header_order() {
        let run = sample_rows();
        let mut report = ReportWriter::from_writer(Vec::new()).expect("writer");
        report
            .write_rows(&[run.count("DFSVisits", 6), run.row("ComponentCount", 2)])
            .expect("rows");
        assert_eq!(report.rows_written(), 2);

        let text = String::from_utf8(report.finish().expect("finish")).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "small_1.json,6,9,SCC,DFSVisits,6,41250");
        assert_eq!(lines[2], "small_1.json,6,9,SCC,ComponentCount,2,41250");
    }

    #[test]
    fn counters_saturate() {
        let row = sample_rows().count("EdgeTraversals", u64::MAX);
        assert_eq!(row.value, i64::MAX);
    }
}
