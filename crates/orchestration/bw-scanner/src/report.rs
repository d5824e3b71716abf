//! Scan results and the human-readable report built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default first line of a report.
pub const DEFAULT_HEADER: &str = "Files with anomalous extensions were found in the following buckets:";

/// Outcome of scanning one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BucketOutcome {
    /// The bucket was fully traversed; `matches` may be empty.
    Scanned { matches: Vec<String> },

    /// Listing the bucket failed; no partial matches are kept.
    Failed { error: String },
}

/// A bucket and its scan outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketScan {
    pub bucket: String,
    #[serde(flatten)]
    pub outcome: BucketOutcome,
}

/// Per-bucket results of one run, in bucket input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    buckets: Vec<BucketScan>,
}

impl ScanResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fully scanned bucket and its matches (in discovery order).
    pub fn record_matches(&mut self, bucket: impl Into<String>, matches: Vec<String>) {
        self.buckets.push(BucketScan {
            bucket: bucket.into(),
            outcome: BucketOutcome::Scanned { matches },
        });
    }

    /// Record a bucket whose scan failed.
    pub fn record_failure(&mut self, bucket: impl Into<String>, error: impl ToString) {
        self.buckets.push(BucketScan {
            bucket: bucket.into(),
            outcome: BucketOutcome::Failed {
                error: error.to_string(),
            },
        });
    }

    /// All bucket entries, in input order.
    pub fn buckets(&self) -> &[BucketScan] {
        &self.buckets
    }

    /// Matches recorded for a bucket, if it was scanned successfully.
    pub fn matches_for(&self, bucket: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|scan| scan.bucket == bucket)
            .and_then(|scan| match &scan.outcome {
                BucketOutcome::Scanned { matches } => Some(matches.as_slice()),
                BucketOutcome::Failed { .. } => None,
            })
    }

    /// Total number of matched keys across buckets.
    pub fn total_matches(&self) -> usize {
        self.buckets
            .iter()
            .map(|scan| match &scan.outcome {
                BucketOutcome::Scanned { matches } => matches.len(),
                BucketOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// Names of buckets whose scan failed.
    pub fn failed_buckets(&self) -> Vec<&str> {
        self.buckets
            .iter()
            .filter(|scan| matches!(scan.outcome, BucketOutcome::Failed { .. }))
            .map(|scan| scan.bucket.as_str())
            .collect()
    }

    /// Check if the run found anything worth reporting: a match or a failure.
    pub fn has_findings(&self) -> bool {
        self.total_matches() > 0 || !self.failed_buckets().is_empty()
    }
}

/// Immutable report text built from a finalized [`ScanResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    text: String,
}

impl Report {
    /// Format a report.
    ///
    /// The header line is followed by one block per bucket, separated by a
    /// blank line. A block is a `Bucket: <name>` line and then one indented
    /// line per match, `No files found.` for a clean bucket, or the error
    /// for a failed one.
    pub fn build(result: &ScanResult, header: &str) -> Self {
        let blocks: Vec<String> = result.buckets().iter().map(format_bucket).collect();

        let mut text = String::from(header);
        for block in blocks {
            text.push_str("\n\n");
            text.push_str(&block);
        }

        Self { text }
    }

    /// The report text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The report followed by an attribution footer, as sent to the channel.
    pub fn with_footer(&self, footer: &str) -> String {
        if footer.is_empty() {
            return self.text.clone();
        }
        format!("{}\n\n{}", self.text, footer)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn format_bucket(scan: &BucketScan) -> String {
    let mut lines = vec![format!("Bucket: {}", scan.bucket)];

    match &scan.outcome {
        BucketOutcome::Scanned { matches } if matches.is_empty() => {
            lines.push("  No files found.".to_string());
        }
        BucketOutcome::Scanned { matches } => {
            lines.extend(matches.iter().map(|key| format!("  {key}")));
        }
        BucketOutcome::Failed { error } => {
            lines.push(format!("  Scan failed: {error}"));
        }
    }

    lines.join("\n")
}
