//! Main execution logic for the bucketwatch CLI.

use anyhow::{Result, bail};
use bw_scanner::{
    ConsoleNotifier, DispatchOutcome, Dispatcher, Notifier, RetryConfig, S3Config, S3Lister,
    ScanConfig, SnsConfig, SnsNotifier, create_s3_client, parse_bucket_list,
};
use tracing::info;

use crate::args::Cli;

/// Execute one scan run with the provided arguments.
///
/// Setup problems (no buckets, missing topic, client construction) are
/// returned as errors; everything after setup is reported in the outcome.
pub async fn execute(args: Cli) -> Result<DispatchOutcome> {
    let buckets = parse_bucket_list(&args.buckets);
    if buckets.is_empty() {
        bail!("No bucket names given (use --buckets or BUCKET_NAMES)");
    }

    let config = build_scan_config(&args);
    let lister = build_lister(&args).await?;

    if args.dry_run {
        info!("Dry run: the report will be printed to stderr");
        return Ok(run_scan(lister, ConsoleNotifier::new(), config, &buckets).await);
    }

    let topic_arn = args
        .topic_arn
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("--topic-arn is required unless --dry-run is set"))?;

    let mut sns_config = SnsConfig::new(topic_arn).with_region(&args.region);

    if let Some(endpoint) = &args.sns_endpoint {
        sns_config = sns_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        sns_config = sns_config.with_credentials(access_key, secret_key);
    }

    if let Some(profile) = &args.profile {
        sns_config = sns_config.with_profile(profile);
    }

    let notifier = SnsNotifier::new(sns_config).await?;
    Ok(run_scan(lister, notifier, config, &buckets).await)
}

/// Build the scan configuration from CLI arguments.
///
/// The extension set is always the built-in one.
fn build_scan_config(args: &Cli) -> ScanConfig {
    let config = ScanConfig::new();

    match &args.subject {
        Some(subject) => config.with_subject(subject),
        None => config,
    }
}

/// Build the S3 listing backend from CLI arguments.
async fn build_lister(args: &Cli) -> Result<S3Lister> {
    let mut s3_config = S3Config::new()
        .with_region(&args.region)
        .with_page_size(args.page_size);

    if let Some(endpoint) = &args.s3_endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    let client = create_s3_client(&s3_config).await?;
    let retry = RetryConfig::new().with_max_retries(args.max_retries);

    Ok(S3Lister::new(client)
        .with_page_size(s3_config.page_size)
        .with_retry(retry))
}

/// Run a scan with a specific notification channel.
async fn run_scan<N: Notifier>(
    lister: S3Lister,
    notifier: N,
    config: ScanConfig,
    buckets: &[String],
) -> DispatchOutcome {
    info!(
        buckets = %buckets.join(","),
        extensions = %config.extensions.description(),
        "Scan configured"
    );

    let dispatcher = Dispatcher::new(lister, notifier, config);
    dispatcher.run(buckets).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw_scanner::ExtensionSet;
    use clap::Parser;

    fn cli(extra: &[&str]) -> Cli {
        let mut argv = vec!["bucketwatch", "--buckets", "a"];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_scan_config_defaults() {
        let config = build_scan_config(&cli(&[]));
        assert_eq!(config.subject, bw_scanner::DEFAULT_SUBJECT);
        assert_eq!(config.extensions, ExtensionSet::default());
        assert!(!config.extensions.is_anomalous("notes.txt"));
    }

    #[test]
    fn test_scan_config_subject_override() {
        let config = build_scan_config(&cli(&["--subject", "Weekly"]));
        assert_eq!(config.subject, "Weekly");
        assert_eq!(config.extensions, ExtensionSet::default());
    }

    #[tokio::test]
    async fn test_empty_bucket_list_rejected() {
        let args = Cli::try_parse_from(["bucketwatch", "--buckets", " , ", "--dry-run"]).unwrap();
        let err = execute(args).await.unwrap_err();
        assert!(err.to_string().contains("No bucket names"));
    }
}
