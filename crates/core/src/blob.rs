//! Object storage for staged input artifacts, consumed through [`BlobStore`].

use async_trait::async_trait;

/// A single object write failed.
#[derive(Debug, thiserror::Error)]
#[error("Failed to write object '{key}': {reason}")]
pub struct BlobError {
    pub key: String,
    pub reason: String,
}

/// Durable object storage.
///
/// `put_object` must be durable when it returns `Ok` and must overwrite an
/// existing object at the same key, so repeating a write with identical
/// content is harmless.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError>;
}
