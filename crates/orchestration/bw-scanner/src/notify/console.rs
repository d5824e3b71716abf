//! Console notification channel for dry runs.

use async_trait::async_trait;
use bw_error::{NotifyError, Result};
use std::io::Write;

use super::{Notifier, PublishReceipt};

/// Prints the report to stderr instead of publishing it.
///
/// Lets a scan be run end to end without a topic, e.g. from a workstation.
/// Stdout is left to the run summary.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Create a new ConsoleNotifier.
    pub fn new() -> Self {
        Self
    }
}

/// Write a subject and message the way [`ConsoleNotifier`] prints them.
fn write_message<W: Write>(out: &mut W, subject: &str, message: &str) -> std::io::Result<()> {
    writeln!(out, "Subject: {subject}\n\n{message}")?;
    out.flush()
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<PublishReceipt> {
        write_message(&mut std::io::stderr().lock(), subject, message)
            .map_err(|e| NotifyError::PublishFailed(format!("Failed to write to stderr: {e}")))?;

        Ok(PublishReceipt::default())
    }

    fn description(&self) -> String {
        "console(stderr)".to_string()
    }
}
