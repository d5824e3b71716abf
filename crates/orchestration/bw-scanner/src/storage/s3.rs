//! S3 listing backend built on `ListObjectsV2`.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;
use bw_error::{ErrorCategory, Result, StorageError, classify_response};
use tracing::debug;

use super::retry::{RetryConfig, with_retry};
use super::{ListPage, ListingBackend};

/// Lists S3 buckets one delimited prefix page at a time.
///
/// Transient failures are retried per call according to the configured
/// [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct S3Lister {
    client: Client,
    page_size: i32,
    retry: RetryConfig,
}

impl S3Lister {
    /// Create a new lister with default page size and retry settings.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            page_size: 1000,
            retry: RetryConfig::default(),
        }
    }

    /// Set the maximum number of keys per page.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.clamp(1, 1000);
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn list_once(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .delimiter(delimiter)
            .max_keys(self.page_size);

        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }

        if let Some(token) = continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| map_list_error(bucket, prefix, e))?;

        let objects: Vec<String> = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| obj.key)
            .filter(|key| !key.is_empty())
            .collect();

        let common_prefixes: Vec<String> = resp
            .common_prefixes
            .unwrap_or_default()
            .into_iter()
            .filter_map(|cp| cp.prefix)
            .collect();

        let next_continuation_token = if resp.is_truncated == Some(true) {
            resp.next_continuation_token
        } else {
            None
        };

        debug!(
            bucket,
            prefix,
            objects = objects.len(),
            common_prefixes = common_prefixes.len(),
            truncated = next_continuation_token.is_some(),
            "Listed page"
        );

        Ok(ListPage {
            objects,
            common_prefixes,
            next_continuation_token,
        })
    }
}

#[async_trait]
impl ListingBackend for S3Lister {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: &str,
        continuation_token: Option<&str>,
    ) -> Result<ListPage> {
        with_retry(&self.retry, "list_objects_v2", move || {
            self.list_once(bucket, prefix, delimiter, continuation_token)
        })
        .await
    }

    fn description(&self) -> String {
        format!("s3(page_size={})", self.page_size)
    }
}

/// Convert an SDK listing failure into a bucket-scoped storage error.
fn map_list_error(
    bucket: &str,
    prefix: &str,
    error: SdkError<ListObjectsV2Error>,
) -> bw_error::BwError {
    let code = error.code().unwrap_or_default().to_string();
    let message = DisplayErrorContext(&error).to_string();
    let transient = match &error {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => true,
        _ => {
            let status = error.raw_response().map(|raw| raw.status().as_u16());
            classify_response(error.code(), status) == ErrorCategory::Transient
        }
    };

    let storage_error = match code.as_str() {
        "NoSuchBucket" => StorageError::NoSuchBucket(bucket.to_string()),
        "AccessDenied" | "AllAccessDisabled" | "InvalidAccessKeyId" => {
            StorageError::AccessDenied {
                bucket: bucket.to_string(),
                message,
            }
        }
        _ => StorageError::ListFailed {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            message,
            transient,
        },
    };

    storage_error.into()
}
