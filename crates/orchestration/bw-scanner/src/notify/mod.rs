//! Notification channels for scan reports.
//!
//! This module provides the [`Notifier`] trait and implementations for
//! delivering a report:
//! - [`SnsNotifier`] - Publishes to an SNS topic
//! - [`ConsoleNotifier`] - Prints the message to stderr (dry runs)

mod console;
mod sns;

pub use console::ConsoleNotifier;
pub use sns::{SnsConfig, SnsNotifier};

use async_trait::async_trait;
use bw_error::Result;
use serde::{Deserialize, Serialize};

/// Acknowledgement returned by a successful publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Channel-assigned message id, when the channel provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Trait for publishing a report to a notification channel.
///
/// A publish is a single side-effecting call; callers never retry it within
/// a run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish one message with a subject line.
    async fn publish(&self, subject: &str, message: &str) -> Result<PublishReceipt>;

    /// Get a human-readable description of this channel, used for logging.
    fn description(&self) -> String;
}
