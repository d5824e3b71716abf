//! bw-scanner - anomalous-extension scanning for S3 buckets.
//!
//! This crate walks S3 buckets, flags objects whose names end in an
//! anomalous extension (media, disk images, junk files) and publishes a
//! single report per run. It supports:
//!
//! - Delimited S3 listing with pagination, retries and LocalStack support
//! - Iterative prefix traversal that visits every prefix exactly once
//! - Per-bucket failure isolation
//! - Publishing to SNS, or printing to stderr for dry runs
//!
//! # Example
//!
//! ```ignore
//! use bw_scanner::{Dispatcher, ScanConfig, S3Config, S3Lister, SnsConfig, SnsNotifier};
//! use bw_scanner::storage::create_s3_client;
//!
//! let s3_config = S3Config::new().with_endpoint("http://localhost:4566");
//! let client = create_s3_client(&s3_config).await?;
//!
//! let notifier = SnsNotifier::new(
//!     SnsConfig::new("arn:aws:sns:us-east-1:000000000000:reports")
//!         .with_endpoint("http://localhost:4566"),
//! )
//! .await?;
//!
//! let dispatcher = Dispatcher::new(S3Lister::new(client), notifier, ScanConfig::new());
//! let outcome = dispatcher.run(&["media-bucket", "logs-bucket"]).await;
//! eprintln!("Found {} anomalous files", outcome.result.total_matches());
//! ```

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod notify;
pub mod report;
pub mod stats;
pub mod storage;
pub mod walker;

pub use classifier::{DEFAULT_ANOMALOUS_EXTENSIONS, ExtensionSet, is_anomalous};
pub use config::{DEFAULT_FOOTER, DEFAULT_SUBJECT, ScanConfig, parse_bucket_list};
pub use dispatcher::{Delivery, DispatchOutcome, Dispatcher};
pub use notify::{ConsoleNotifier, Notifier, PublishReceipt, SnsConfig, SnsNotifier};
pub use report::{BucketOutcome, BucketScan, DEFAULT_HEADER, Report, ScanResult};
pub use stats::ScanStats;
pub use storage::{
    InMemoryBackend, ListPage, ListingBackend, RetryConfig, S3Config, S3Lister, create_s3_client,
};
pub use walker::{BucketWalker, SEPARATOR, WalkStats};
