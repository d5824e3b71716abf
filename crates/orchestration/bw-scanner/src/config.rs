//! Configuration types for a scan run.

use serde::{Deserialize, Serialize};

use crate::classifier::ExtensionSet;
use crate::report::DEFAULT_HEADER;

/// Default notification subject.
pub const DEFAULT_SUBJECT: &str = "Anomalous files found in S3 buckets";

/// Default attribution footer appended to every published report.
pub const DEFAULT_FOOTER: &str =
    "This report was generated automatically by bucketwatch. Flagged objects were not modified.";

/// Immutable configuration handed to the dispatcher at construction.
#[derive(Debug, Clone, Serialize)]
pub struct ScanConfig {
    /// Extensions that mark a key as anomalous
    pub extensions: ExtensionSet,

    /// Notification subject line
    pub subject: String,

    /// First line of the report
    pub header: String,

    /// Attribution footer appended when publishing
    pub footer: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: ExtensionSet::default(),
            subject: DEFAULT_SUBJECT.to_string(),
            header: DEFAULT_HEADER.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extension set.
    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set the notification subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the report header line.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the attribution footer.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }
}

/// Split a comma-separated bucket list.
///
/// Entries are trimmed, empty entries dropped, and repeated names kept only
/// at their first position.
pub fn parse_bucket_list(raw: &str) -> Vec<String> {
    let mut buckets: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        if !buckets.iter().any(|existing| existing == name) {
            buckets.push(name.to_string());
        }
    }
    buckets
}
