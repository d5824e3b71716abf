//! Storage listing backends.
//!
//! This module provides the [`ListingBackend`] trait the walker drives, and
//! its implementations:
//! - [`S3Lister`] - `ListObjectsV2` against S3 (or LocalStack)
//! - [`InMemoryBackend`] - paged in-memory buckets for tests and dry runs

mod client;
mod memory;
mod retry;
mod s3;

pub use client::{S3Config, create_s3_client};
pub use memory::{InMemoryBackend, ListCall};
pub use retry::{RetryConfig, with_retry};
pub use s3::S3Lister;

use async_trait::async_trait;
use bw_error::Result;

/// One page of a delimited listing under a single prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Object keys directly under the prefix
    pub objects: Vec<String>,

    /// Sub-prefixes grouped by the delimiter (each ends with the delimiter)
    pub common_prefixes: Vec<String>,

    /// Token for the next page; `None` when the prefix is drained
    pub next_continuation_token: Option<String>,
}

/// Trait for storage backends that can list a bucket one prefix at a time.
///
/// A call returns the objects and common prefixes directly under `prefix`,
/// grouped by `delimiter`. Callers pass back `next_continuation_token` until
/// it is `None` to drain the prefix.
#[async_trait]
pub trait ListingBackend: Send + Sync {
    /// List a single page under `prefix`.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage>;

    /// Get a human-readable description of this backend, used for logging.
    fn description(&self) -> String;
}
