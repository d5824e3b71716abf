//! Retry logic for storage listing calls.
//!
//! Provides exponential backoff with jitter for transient S3 errors. Only a
//! single backend call is retried; a failed bucket is never rescanned.

use bw_error::{ErrorCategory, Result, classify_error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries before giving up.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
    /// Whether to add jitter to backoff times.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that never retries.
    pub fn disabled() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial backoff in milliseconds.
    pub fn with_initial_backoff_ms(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    /// Set the maximum backoff in milliseconds.
    pub fn with_max_backoff_ms(mut self, max_backoff_ms: u64) -> Self {
        self.max_backoff_ms = max_backoff_ms;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let base_ms = self
            .initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        let capped_ms = base_ms.min(self.max_backoff_ms);

        let final_ms = if self.jitter {
            let jitter_range = capped_ms / 4;
            let jitter = rand::rng().random_range(0..=jitter_range);
            capped_ms.saturating_add(jitter)
        } else {
            capped_ms
        };

        Duration::from_millis(final_ms)
    }
}

/// Execute an async backend call with retry logic.
///
/// Permanent errors (see [`classify_error`]) are returned immediately;
/// transient errors are retried up to `config.max_retries` times.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        if classify_error(&error) == ErrorCategory::Permanent {
            warn!(
                operation = operation_name,
                attempt,
                error = %error,
                "Non-retryable error"
            );
            return Err(error);
        }

        if attempt >= config.max_retries {
            return Err(error);
        }

        let backoff = config.backoff_duration(attempt);
        warn!(
            operation = operation_name,
            attempt,
            error = %error,
            backoff_ms = backoff.as_millis() as u64,
            "Retryable error, backing off"
        );
        sleep(backoff).await;
        attempt += 1;
    }
}
