//! In-memory listing backend.
//!
//! Emulates S3 delimited listing over a fixed set of keys, including
//! `max-keys` pagination and common-prefix grouping. Used by unit tests.

use async_trait::async_trait;
use bw_error::{ErrorCategory, Result, StorageError, classify_message};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use super::{ListPage, ListingBackend};

/// A recorded `list_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub bucket: String,
    pub prefix: String,
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Entry {
    Object(String),
    Prefix(String),
}

impl Entry {
    fn name(&self) -> &str {
        match self {
            Self::Object(key) | Self::Prefix(key) => key,
        }
    }
}

/// Paged, delimiter-aware listing over in-memory buckets.
#[derive(Debug)]
pub struct InMemoryBackend {
    buckets: HashMap<String, BTreeSet<String>>,
    failures: HashMap<(String, Option<String>), String>,
    page_size: usize,
    calls: Mutex<Vec<ListCall>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
            failures: HashMap::new(),
            page_size: 1000,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl InMemoryBackend {
    /// Create an empty backend with no buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bucket holding the given keys.
    pub fn with_bucket<I, S>(mut self, bucket: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets
            .insert(bucket.into(), keys.into_iter().map(Into::into).collect());
        self
    }

    /// Set the maximum number of entries (objects plus prefixes) per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every listing call against `bucket` fail.
    pub fn with_failing_bucket(
        mut self,
        bucket: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures.insert((bucket.into(), None), message.into());
        self
    }

    /// Make listing calls for one prefix of `bucket` fail.
    pub fn with_failing_prefix(
        mut self,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures
            .insert((bucket.into(), Some(prefix.into())), message.into());
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<ListCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls made for a specific bucket and prefix.
    pub fn calls_for(&self, bucket: &str, prefix: &str) -> Vec<ListCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.bucket == bucket && call.prefix == prefix)
            .collect()
    }

    fn record(&self, bucket: &str, prefix: &str, continuation_token: Option<&str>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ListCall {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                continuation_token: continuation_token.map(str::to_string),
            });
    }

    fn failure_for(&self, bucket: &str, prefix: &str) -> Option<&String> {
        self.failures
            .get(&(bucket.to_string(), None))
            .or_else(|| self.failures.get(&(bucket.to_string(), Some(prefix.to_string()))))
    }

    /// Group the keys under `prefix` the way S3 does for a delimited listing.
    fn entries(keys: &BTreeSet<String>, prefix: &str, delimiter: &str) -> Vec<Entry> {
        let mut entries = BTreeSet::new();
        for key in keys.iter().filter(|key| key.starts_with(prefix)) {
            let rest = &key[prefix.len()..];
            match rest.find(delimiter).filter(|_| !delimiter.is_empty()) {
                Some(idx) => {
                    let end = prefix.len() + idx + delimiter.len();
                    entries.insert(Entry::Prefix(key[..end].to_string()));
                }
                None => {
                    entries.insert(Entry::Object(key.clone()));
                }
            }
        }

        let mut entries: Vec<Entry> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        entries
    }
}

#[async_trait]
impl ListingBackend for InMemoryBackend {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage> {
        self.record(bucket, prefix, continuation_token);

        if let Some(message) = self.failure_for(bucket, prefix) {
            return Err(StorageError::ListFailed {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                message: message.clone(),
                transient: classify_message(message) == ErrorCategory::Transient,
            }
            .into());
        }

        let keys = self
            .buckets
            .get(bucket)
            .ok_or_else(|| StorageError::NoSuchBucket(bucket.to_string()))?;

        let offset = match continuation_token {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| StorageError::ListFailed {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                message: format!("invalid continuation token '{token}'"),
                transient: false,
            })?,
        };

        let entries = Self::entries(keys, prefix, delimiter);
        let end = (offset + self.page_size).min(entries.len());

        let mut page = ListPage::default();
        for entry in entries.get(offset..end).unwrap_or_default() {
            match entry {
                Entry::Object(key) => page.objects.push(key.clone()),
                Entry::Prefix(p) => page.common_prefixes.push(p.clone()),
            }
        }
        if end < entries.len() {
            page.next_continuation_token = Some(end.to_string());
        }

        Ok(page)
    }

    fn description(&self) -> String {
        format!(
            "memory(buckets={}, page_size={})",
            self.buckets.len(),
            self.page_size
        )
    }
}
