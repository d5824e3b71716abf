//! CLI argument definitions for bucketwatch.

use bw_cli_common::LogLevel;
use clap::{Parser, ValueEnum};

/// Scan S3 buckets for anomalous files.
///
/// Walks every object in the given buckets, flags keys ending in media,
/// disk-image or junk-file extensions and publishes one report to an SNS
/// topic. Nothing is published when every bucket is clean.
///
/// ## Examples
///
/// Basic usage:
///   bucketwatch --buckets media-bucket,logs-bucket \
///       --topic-arn arn:aws:sns:us-east-1:123456789012:bucket-reports
///
/// Print the report instead of publishing it:
///   bucketwatch --buckets media-bucket --dry-run
///
/// Against LocalStack:
///   bucketwatch --buckets test-bucket --topic-arn "$TOPIC" \
///       --s3-endpoint http://localhost:4566 --sns-endpoint http://localhost:4566
#[derive(Parser, Debug)]
#[command(name = "bucketwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Scan Options ===
    /// Comma-separated bucket names, scanned in the given order
    #[arg(short, long, env = "BUCKET_NAMES")]
    pub buckets: String,

    /// Maximum keys per listing page (1-1000)
    #[arg(long, default_value = "1000", value_parser = parse_page_size)]
    pub page_size: i32,

    /// Maximum retries for a failed listing call
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    // === S3 Configuration ===
    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "BW_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    // === Notification Options ===
    /// SNS topic ARN the report is published to (required unless --dry-run)
    #[arg(long, env = "SNS_TOPIC_ARN")]
    pub topic_arn: Option<String>,

    /// Custom SNS endpoint URL (for LocalStack)
    #[arg(long, env = "BW_SNS_ENDPOINT")]
    pub sns_endpoint: Option<String>,

    /// Notification subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Print the report to stderr instead of publishing it
    #[arg(long)]
    pub dry_run: bool,

    // === Output Options ===
    /// Format of the run summary
    #[arg(long, value_enum, default_value = "text")]
    pub summary_format: SummaryFormat,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Run summary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable summary on stderr
    Text,
    /// Full run outcome as pretty-printed JSON on stdout
    Json,
}

/// Parse a listing page size (1-1000).
fn parse_page_size(s: &str) -> Result<i32, String> {
    let value: i32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(1..=1000).contains(&value) {
        return Err(format!("{} is not in 1..=1000", value));
    }
    Ok(value)
}
