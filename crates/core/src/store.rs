//! The job record table, consumed through [`JobStore`].

use async_trait::async_trait;

use crate::job::Job;
use crate::types::JobId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing table could not be reached or rejected the operation.
    #[error("Job store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped back into a [`Job`].
    #[error("Stored job record is malformed: {0}")]
    Corrupt(String),
}

/// Keyed durable table mapping job id to job record.
///
/// Contract for implementations:
///
/// - `put` is a single atomic write that replaces any existing record with
///   the same id.
/// - Read-after-write: once `put` returns `Ok`, an immediate `get` for the
///   same id observes it. Eventually-consistent replicas are not acceptable
///   on this path.
/// - Records may be purged at any time after their `expires_at`; callers
///   never rely on a record outliving it.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn put(&self, job: &Job) -> Result<(), StoreError>;

    async fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError>;

    /// Cheap reachability probe used by the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
