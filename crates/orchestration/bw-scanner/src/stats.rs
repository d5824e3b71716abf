//! Statistics for scan runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::walker::WalkStats;

/// Statistics collected during a scan run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Buckets fully traversed
    pub buckets_scanned: usize,

    /// Buckets whose listing failed
    pub buckets_failed: usize,

    /// Prefixes listed across all buckets
    pub prefixes_visited: usize,

    /// Listing calls (pages) across all buckets
    pub list_calls: usize,

    /// Object entries seen across all buckets
    pub objects_seen: usize,

    /// Anomalous keys found
    pub matches: usize,

    /// Anomalous keys per matched extension
    pub matches_by_extension: BTreeMap<String, usize>,

    /// Errors encountered (bucket and dispatch level)
    pub errors: Vec<String>,
}

impl ScanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the run as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Fold in the counters of a walk, successful or not.
    pub fn record_walk(&mut self, walk: &WalkStats) {
        self.prefixes_visited += walk.prefixes_visited;
        self.list_calls += walk.list_calls;
        self.objects_seen += walk.objects_seen;
    }

    /// Record a fully scanned bucket.
    pub fn record_bucket_scanned(&mut self) {
        self.buckets_scanned += 1;
    }

    /// Record a failed bucket.
    pub fn record_bucket_failed(&mut self, error: impl ToString) {
        self.buckets_failed += 1;
        self.errors.push(error.to_string());
    }

    /// Record one anomalous key by its matched extension.
    pub fn record_match(&mut self, extension: &str) {
        self.matches += 1;
        *self
            .matches_by_extension
            .entry(extension.to_string())
            .or_insert(0) += 1;
    }

    /// Record an error.
    pub fn record_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    /// Get the duration of the run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Calculate the throughput in objects per second.
    pub fn objects_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.objects_seen as f64 / secs
            } else {
                0.0
            }
        })
    }
}
