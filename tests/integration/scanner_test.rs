//! Bucket scanning integration tests using LocalStack.
//!
//! These tests run the walker and dispatcher against real S3 listings and
//! publish reports to a LocalStack SNS topic.

use crate::common::LocalStackTestContext;
use async_trait::async_trait;
use bw_error::Result;
use bw_scanner::{
    BucketWalker, Delivery, Dispatcher, ExtensionSet, Notifier, PublishReceipt, ScanConfig,
    WalkStats,
};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Notifier that collects published messages for verification.
#[derive(Default, Clone)]
struct CollectingNotifier {
    messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl CollectingNotifier {
    fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<PublishReceipt> {
        self.messages
            .lock()
            .unwrap()
            .push((subject.to_string(), message.to_string()));
        Ok(PublishReceipt::default())
    }

    fn description(&self) -> String {
        "collecting".to_string()
    }
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_walk_nested_bucket() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bw-test-nested";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.put_objects(
        bucket,
        &["a/b/song.mp3", "a/c/doc.pdf", "movie.mov", "a/", "deep/x/y/z/backup.ISO"],
    )
    .await
    .unwrap();

    let lister = ctx.lister(1000).await;
    let extensions = ExtensionSet::default();
    let walker = BucketWalker::new(&lister, &extensions);
    let mut stats = WalkStats::default();

    let matches: BTreeSet<String> = walker
        .collect_matches(bucket, &mut stats)
        .await
        .unwrap()
        .into_iter()
        .collect();

    let expected: BTreeSet<String> = ["a/b/song.mp3", "movie.mov", "deep/x/y/z/backup.ISO"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(matches, expected);
    assert_eq!(stats.matches, 3);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_walk_drains_every_page() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bw-test-paged";
    ctx.create_bucket(bucket).await.unwrap();

    let keys: Vec<String> = (0..7).map(|i| format!("clips/clip-{i}.mp4")).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    ctx.put_objects(bucket, &key_refs).await.unwrap();

    let lister = ctx.lister(2).await;
    let extensions = ExtensionSet::default();
    let walker = BucketWalker::new(&lister, &extensions);
    let mut stats = WalkStats::default();

    let matches = walker.collect_matches(bucket, &mut stats).await.unwrap();

    assert_eq!(matches.len(), 7);
    // Root listing (one page) plus four pages for seven keys under clips/
    assert!(stats.list_calls >= 5);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_is_isolated() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bw-test-isolation";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.put_object(bucket, "media/track.flac").await.unwrap();

    let notifier = CollectingNotifier::default();
    let dispatcher = Dispatcher::new(ctx.lister(1000).await, notifier.clone(), ScanConfig::new());

    let buckets = ["bw-test-does-not-exist", bucket];
    let outcome = dispatcher.run(&buckets).await;

    assert_eq!(outcome.result.failed_buckets(), vec!["bw-test-does-not-exist"]);
    assert_eq!(
        outcome.result.matches_for(bucket),
        Some(&["media/track.flac".to_string()][..])
    );

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].1.contains("Bucket: bw-test-does-not-exist\n  Scan failed:"));
    assert!(messages[0].1.contains("  media/track.flac"));
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_clean_bucket_publishes_nothing() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bw-test-clean";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.put_objects(bucket, &["reports/q1.csv", "reports/q2.csv"])
        .await
        .unwrap();

    let notifier = CollectingNotifier::default();
    let dispatcher = Dispatcher::new(ctx.lister(1000).await, notifier.clone(), ScanConfig::new());

    let outcome = dispatcher.run(&[bucket]).await;

    assert_eq!(outcome.delivery, Delivery::Suppressed);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_report_published_to_sns() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "bw-test-publish";
    ctx.create_bucket(bucket).await.unwrap();
    ctx.put_object(bucket, "uploads/holiday.MOV").await.unwrap();

    let topic_arn = ctx.create_topic("bw-test-reports").await.unwrap();
    let notifier = ctx.notifier(&topic_arn).await;
    let dispatcher = Dispatcher::new(ctx.lister(1000).await, notifier, ScanConfig::new());

    let outcome = dispatcher.run(&[bucket]).await;

    match &outcome.delivery {
        Delivery::Sent { message_id } => assert!(message_id.is_some()),
        other => panic!("Expected report to be sent, got {other:?}"),
    }
    assert!(!outcome.has_errors());
}
