//! One-way worker invocation, consumed through [`WorkerTrigger`].

use async_trait::async_trait;
use serde::Serialize;

use crate::types::JobId;

#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The request never reached the worker endpoint (network, DNS, TLS).
    #[error("Worker endpoint unreachable: {0}")]
    Unreachable(String),

    /// The endpoint answered but refused to accept the job.
    #[error("Worker endpoint rejected job ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// The only payload a worker receives. It re-reads everything else from the
/// job store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPayload<'a> {
    pub job_id: &'a JobId,
}

/// Fire-and-forget signal asking an external worker to process a job.
///
/// `notify` returns once the external system has acknowledged receipt, never
/// once processing finishes. Delivery is at-least-once: implementations do
/// not deduplicate, and a worker may see the same id more than once.
#[async_trait]
pub trait WorkerTrigger: Send + Sync {
    async fn notify(&self, job_id: &JobId) -> Result<(), TriggerError>;
}
