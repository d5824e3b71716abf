//! LocalStack test context and utilities.

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_sns::Client as SnsClient;
use bw_scanner::{S3Config, S3Lister, SnsConfig, SnsNotifier, create_s3_client};

/// LocalStack test context providing S3 and SNS clients.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub sns: SnsClient,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(Credentials::new("test", "test", None, None, "localstack"))
            .endpoint_url(&endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            sns: SnsClient::new(&config),
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create an S3 bucket for testing, if it does not exist yet.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Upload an empty object under `key`.
    pub async fn put_object(&self, bucket: &str, key: &str) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(Vec::new().into())
            .send()
            .await?;
        Ok(())
    }

    /// Upload empty objects for every key.
    pub async fn put_objects(&self, bucket: &str, keys: &[&str]) -> Result<(), aws_sdk_s3::Error> {
        for key in keys {
            self.put_object(bucket, key).await?;
        }
        Ok(())
    }

    /// Create an SNS topic and return its ARN.
    pub async fn create_topic(&self, name: &str) -> Result<String, aws_sdk_sns::Error> {
        let result = self.sns.create_topic().name(name).send().await?;
        Ok(result.topic_arn.unwrap_or_default())
    }

    /// Build a listing backend against LocalStack.
    pub async fn lister(&self, page_size: i32) -> S3Lister {
        let config = S3Config::new()
            .with_endpoint(&self.endpoint)
            .with_region(&self.region)
            .with_credentials("test", "test")
            .with_page_size(page_size);

        let client = create_s3_client(&config)
            .await
            .expect("Failed to create S3 client");
        S3Lister::new(client).with_page_size(config.page_size)
    }

    /// Build an SNS notifier for `topic_arn` against LocalStack.
    pub async fn notifier(&self, topic_arn: &str) -> SnsNotifier {
        let config = SnsConfig::new(topic_arn)
            .with_endpoint(&self.endpoint)
            .with_region(&self.region)
            .with_credentials("test", "test");

        SnsNotifier::new(config)
            .await
            .expect("Failed to create SNS notifier")
    }
}
