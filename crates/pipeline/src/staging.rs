//! Blob staging: durable writes of a job's input images before the job
//! record exists.

use std::sync::Arc;

use futures::future::try_join_all;
use poster_core::blob::BlobStore;
use poster_core::job::Artifact;
use poster_core::types::JobId;

/// Key prefix for staged inputs.
pub const STAGING_PREFIX: &str = "temp";

/// Content type recorded on every staged input.
pub const STAGED_CONTENT_TYPE: &str = "image/jpeg";

/// Writing input `index` failed; the whole batch is abandoned.
#[derive(Debug, thiserror::Error)]
#[error("Failed to stage input {index} at '{key}': {reason}")]
pub struct StagingError {
    pub index: usize,
    pub key: String,
    pub reason: String,
}

/// Deterministic key for input `index` of `job_id`.
///
/// Depends only on its arguments, so retrying a write hits the same object.
pub fn staging_key(job_id: &JobId, index: usize) -> String {
    format!("{STAGING_PREFIX}/{job_id}/img_{index}.jpg")
}

/// Writes one job's inputs to object storage.
pub struct BlobStager {
    store: Arc<dyn BlobStore>,
}

impl BlobStager {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Write every payload concurrently and wait for all of them.
    ///
    /// The returned artifacts are in payload order. On the first failure the
    /// remaining in-flight writes are dropped and the error is returned;
    /// objects that did land are left orphaned and never referenced.
    pub async fn stage(
        &self,
        job_id: &JobId,
        payloads: Vec<Vec<u8>>,
    ) -> Result<Vec<Artifact>, StagingError> {
        let writes = payloads
            .into_iter()
            .enumerate()
            .map(|(index, body)| self.stage_one(job_id, index, body));

        try_join_all(writes).await
    }

    async fn stage_one(
        &self,
        job_id: &JobId,
        index: usize,
        body: Vec<u8>,
    ) -> Result<Artifact, StagingError> {
        let key = staging_key(job_id, index);
        let size_bytes = body.len() as u64;

        self.store
            .put_object(&key, body, STAGED_CONTENT_TYPE)
            .await
            .map_err(|e| StagingError {
                index,
                key: key.clone(),
                reason: e.reason,
            })?;

        tracing::debug!(job_id = %job_id, index, key = %key, size_bytes, "Input staged");

        Ok(Artifact {
            key,
            content_type: STAGED_CONTENT_TYPE.to_string(),
            size_bytes,
        })
    }
}
