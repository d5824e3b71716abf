//! Report dispatcher: scan every bucket, build the report, publish it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::notify::Notifier;
use crate::report::{Report, ScanResult};
use crate::stats::ScanStats;
use crate::storage::ListingBackend;
use crate::walker::{BucketWalker, WalkStats};

/// What happened to the report at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    /// Published once to the notification channel.
    Sent {
        #[serde(skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },

    /// Nothing to report: no matches and no bucket failures.
    Suppressed,

    /// The publish call failed; scan results are still valid.
    Failed { error: String },
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub result: ScanResult,
    pub report: Report,
    pub delivery: Delivery,
    pub stats: ScanStats,
}

impl DispatchOutcome {
    /// Check if any bucket failed or delivery failed.
    ///
    /// The run completed either way; this only signals partial failure.
    pub fn has_errors(&self) -> bool {
        !self.result.failed_buckets().is_empty() || matches!(self.delivery, Delivery::Failed { .. })
    }
}

/// Coordinates bucket walks, report building and delivery for one run.
///
/// Generic over the listing backend and the notification channel so tests
/// can inject in-memory fakes.
pub struct Dispatcher<B: ListingBackend, N: Notifier> {
    backend: B,
    notifier: N,
    config: ScanConfig,
}

impl<B: ListingBackend, N: Notifier> Dispatcher<B, N> {
    /// Create a new Dispatcher.
    pub fn new(backend: B, notifier: N, config: ScanConfig) -> Self {
        Self {
            backend,
            notifier,
            config,
        }
    }

    /// Run one scan over `buckets`, in order.
    ///
    /// Bucket failures are recorded and scanning continues with the next
    /// bucket. The report is published exactly once when there is at least
    /// one match or one failed bucket, and suppressed otherwise. Backend and
    /// channel errors never escape this call.
    pub async fn run<S: AsRef<str>>(&self, buckets: &[S]) -> DispatchOutcome {
        let mut result = ScanResult::new();
        let mut stats = ScanStats::new();

        info!(
            buckets = buckets.len(),
            backend = %self.backend.description(),
            notifier = %self.notifier.description(),
            extensions = self.config.extensions.len(),
            "Starting scan run"
        );

        for bucket in buckets {
            let bucket = bucket.as_ref();
            self.scan_bucket(bucket, &mut result, &mut stats).await;
        }

        let report = Report::build(&result, &self.config.header);
        debug!(
            matches = result.total_matches(),
            failed_buckets = result.failed_buckets().len(),
            "Scan results aggregated"
        );

        let delivery = if result.has_findings() {
            self.deliver(&report, &mut stats).await
        } else {
            info!("No anomalous files found, notification suppressed");
            Delivery::Suppressed
        };

        stats.complete();

        info!(
            buckets_scanned = stats.buckets_scanned,
            buckets_failed = stats.buckets_failed,
            objects = stats.objects_seen,
            matches = stats.matches,
            errors = stats.error_count(),
            "Scan run completed"
        );

        DispatchOutcome {
            result,
            report,
            delivery,
            stats,
        }
    }

    async fn scan_bucket(&self, bucket: &str, result: &mut ScanResult, stats: &mut ScanStats) {
        debug!(bucket, "Scanning bucket");

        let walker = BucketWalker::new(&self.backend, &self.config.extensions);
        let mut walk_stats = WalkStats::default();
        let outcome = walker.collect_matches(bucket, &mut walk_stats).await;
        stats.record_walk(&walk_stats);

        match outcome {
            Ok(matches) => {
                info!(
                    bucket,
                    matches = matches.len(),
                    objects = walk_stats.objects_seen,
                    "Bucket scanned"
                );
                for key in &matches {
                    if let Some(extension) = self.config.extensions.extension_of(key) {
                        stats.record_match(extension);
                    }
                }
                stats.record_bucket_scanned();
                result.record_matches(bucket, matches);
            }
            Err(e) => {
                warn!(bucket, error = %e, "Bucket scan failed");
                stats.record_bucket_failed(format!("Scan of bucket {bucket} failed: {e}"));
                result.record_failure(bucket, e);
            }
        }
    }

    async fn deliver(&self, report: &Report, stats: &mut ScanStats) -> Delivery {
        let message = report.with_footer(&self.config.footer);

        match self.notifier.publish(&self.config.subject, &message).await {
            Ok(receipt) => {
                info!(message_id = ?receipt.message_id, "Report sent");
                Delivery::Sent {
                    message_id: receipt.message_id,
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to send report");
                stats.record_error(format!("Report delivery failed: {e}"));
                Delivery::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
