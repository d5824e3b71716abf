//! SNS notification channel.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::Client;
use aws_sdk_sns::error::DisplayErrorContext;
use bw_error::{BwError, NotifyError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Notifier, PublishReceipt};

/// SNS limits the subject to 100 characters.
pub const MAX_SUBJECT_CHARS: usize = 100;

/// SNS limits a published message to 256 KiB.
pub const MAX_MESSAGE_BYTES: usize = 256 * 1024;

const TRUNCATION_MARKER: &str = "\n\n[report truncated]";

/// Configuration for SNS output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsConfig {
    /// Topic ARN to publish to
    pub topic_arn: String,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// AWS region
    pub region: Option<String>,

    /// Explicit AWS access key (optional, uses default credentials if not set)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional, uses default credentials if not set)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl SnsConfig {
    /// Create a new SnsConfig with the required topic ARN.
    pub fn new(topic_arn: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            endpoint: None,
            region: None,
            access_key: None,
            secret_key: None,
            profile: None,
        }
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Publishes reports to an SNS topic.
pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    /// Create a new SnsNotifier from configuration.
    ///
    /// Fails when the topic ARN is blank.
    pub async fn new(config: SnsConfig) -> Result<Self> {
        if config.topic_arn.trim().is_empty() {
            return Err(BwError::Config("SNS topic ARN is empty".to_string()));
        }

        let client = build_sns_client(&config).await;
        Ok(Self {
            client,
            topic_arn: config.topic_arn,
        })
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<PublishReceipt> {
        let subject = clamp_subject(subject)?;
        let message = clamp_message(message);

        debug!(
            topic_arn = %self.topic_arn,
            subject = %subject,
            bytes = message.len(),
            "Publishing to SNS"
        );

        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::PublishFailed(DisplayErrorContext(&e).to_string()))?;

        let message_id = output.message_id;
        info!(topic_arn = %self.topic_arn, message_id = ?message_id, "Published report");

        Ok(PublishReceipt { message_id })
    }

    fn description(&self) -> String {
        format!("sns({})", self.topic_arn)
    }
}

/// Make a subject SNS accepts: single line, non-empty, at most 100 characters.
fn clamp_subject(subject: &str) -> Result<String> {
    let single_line: String = subject
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let trimmed = single_line.trim();

    if trimmed.is_empty() {
        return Err(NotifyError::InvalidMessage("subject is empty".to_string()).into());
    }

    Ok(trimmed.chars().take(MAX_SUBJECT_CHARS).collect())
}

/// Truncate a message to the SNS size limit on a character boundary.
fn clamp_message(message: &str) -> String {
    if message.len() <= MAX_MESSAGE_BYTES {
        return message.to_string();
    }

    let mut end = MAX_MESSAGE_BYTES - TRUNCATION_MARKER.len();
    while !message.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{}", &message[..end], TRUNCATION_MARKER)
}

/// Build an SNS client from configuration.
async fn build_sns_client(config: &SnsConfig) -> Client {
    use aws_config::Region;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials = aws_sdk_sns::config::Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "bucketwatch",
        );
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let sdk_config = loader.load().await;
    Client::new(&sdk_config)
}
