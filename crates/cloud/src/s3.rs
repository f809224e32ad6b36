//! S3 staging bucket.
//!
//! Implements [`BlobStore`] with `PutObject`, which overwrites in place, so
//! re-staging the same key with the same bytes is a no-op in effect.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use poster_core::blob::{BlobError, BlobStore};

/// Staging bucket client.
#[derive(Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
}

impl S3BlobStore {
    /// Wrap an existing S3 client.
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the default AWS credential chain for `region`.
    pub async fn connect(region: impl Into<String>, bucket: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;
        Self::new(S3Client::new(&config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `s3://bucket/key` form of an object location, for logs.
    pub fn object_uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(uri = %self.object_uri(key), error = %DisplayErrorContext(&e), "S3 put failed");
                BlobError {
                    key: key.to_string(),
                    reason: DisplayErrorContext(&e).to_string(),
                }
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::config::Credentials;

    use super::*;

    fn offline_store() -> S3BlobStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("ap-south-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .build();
        S3BlobStore::new(S3Client::from_conf(config), "poster-staging")
    }

    #[tokio::test]
    async fn object_uri_includes_bucket_and_key() {
        let store = offline_store();
        assert_eq!(store.bucket(), "poster-staging");
        assert_eq!(
            store.object_uri("temp/J/img_0.jpg"),
            "s3://poster-staging/temp/J/img_0.jpg"
        );
    }
}
