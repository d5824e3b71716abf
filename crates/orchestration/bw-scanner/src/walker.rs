//! Bucket traversal.
//!
//! [`BucketWalker`] enumerates every object in a bucket with delimited
//! listings, descending through prefixes with an explicit LIFO work list
//! rather than recursion, and yields the keys the [`ExtensionSet`] flags.

use async_stream::try_stream;
use bw_error::Result;
use futures::{Stream, StreamExt, pin_mut};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::classifier::ExtensionSet;
use crate::storage::ListingBackend;

/// Path separator used as the listing delimiter.
pub const SEPARATOR: &str = "/";

/// Counters for a single bucket walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Distinct prefixes listed (including the bucket root)
    pub prefixes_visited: usize,

    /// Listing calls made, one per page
    pub list_calls: usize,

    /// Object entries returned by the backend
    pub objects_seen: usize,

    /// Keys flagged as anomalous
    pub matches: usize,
}

/// Walks a bucket and yields anomalous keys.
///
/// Borrowed view over a backend and an extension set; cheap to create per
/// bucket.
pub struct BucketWalker<'a, B: ListingBackend + ?Sized> {
    backend: &'a B,
    extensions: &'a ExtensionSet,
}

impl<'a, B: ListingBackend + ?Sized> BucketWalker<'a, B> {
    /// Create a new walker.
    pub fn new(backend: &'a B, extensions: &'a ExtensionSet) -> Self {
        Self {
            backend,
            extensions,
        }
    }

    /// Walk `bucket`, yielding every anomalous key.
    ///
    /// Each call performs a fresh traversal. A failed listing call ends the
    /// stream with that error.
    pub fn walk<'s>(&'s self, bucket: &'s str) -> impl Stream<Item = Result<String>> + 's {
        try_stream! {
            let mut stats = WalkStats::default();
            let inner = self.walk_with_stats(bucket, &mut stats);
            pin_mut!(inner);

            while let Some(key) = inner.next().await {
                yield key?;
            }
        }
    }

    /// Walk `bucket`, recording traversal counters into `stats`.
    ///
    /// Prefixes are taken from a LIFO work list seeded with the bucket root.
    /// Every page of a prefix is drained before the next prefix is popped.
    /// Both common prefixes and keys ending in the separator are descended
    /// into; a prefix is listed at most once per walk.
    pub fn walk_with_stats<'s>(
        &'s self,
        bucket: &'s str,
        stats: &'s mut WalkStats,
    ) -> impl Stream<Item = Result<String>> + 's {
        try_stream! {
            let mut pending: Vec<String> = vec![String::new()];
            let mut visited: HashSet<String> = HashSet::from([String::new()]);

            while let Some(prefix) = pending.pop() {
                stats.prefixes_visited += 1;
                debug!(bucket, prefix = %prefix, pending = pending.len(), "Listing prefix");

                let mut continuation_token: Option<String> = None;
                loop {
                    let page = self
                        .backend
                        .list_page(bucket, &prefix, SEPARATOR, continuation_token.as_deref())
                        .await?;
                    stats.list_calls += 1;

                    for key in page.objects {
                        stats.objects_seen += 1;

                        if self.extensions.is_anomalous(&key) {
                            stats.matches += 1;
                            trace!(bucket, key = %key, "Anomalous object");
                            yield key;
                        } else if key.ends_with(SEPARATOR) && visited.insert(key.clone()) {
                            pending.push(key);
                        }
                    }

                    for sub_prefix in page.common_prefixes {
                        if visited.insert(sub_prefix.clone()) {
                            pending.push(sub_prefix);
                        }
                    }

                    match page.next_continuation_token {
                        Some(token) => continuation_token = Some(token),
                        None => break,
                    }
                }
            }

            debug!(
                bucket,
                prefixes = stats.prefixes_visited,
                list_calls = stats.list_calls,
                objects = stats.objects_seen,
                matches = stats.matches,
                "Walk completed"
            );
        }
    }

    /// Drain a full walk into a vector of matches, in discovery order.
    pub async fn collect_matches(&self, bucket: &str, stats: &mut WalkStats) -> Result<Vec<String>> {
        let mut matches = Vec::new();
        let stream = self.walk_with_stats(bucket, stats);
        pin_mut!(stream);

        while let Some(key) = stream.next().await {
            matches.push(key?);
        }

        Ok(matches)
    }
}
