//! Job submission: validate → stage → persist → trigger.
//!
//! The only durable commitment point is the job record write. Anything that
//! fails before it leaves no record; anything that fails after it leaves a
//! record the caller can still see. Nothing is retried here.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use poster_core::blob::BlobStore;
use poster_core::error::CoreError;
use poster_core::job::Job;
use poster_core::store::{JobStore, StoreError};
use poster_core::trigger::{TriggerError, WorkerTrigger};
use poster_core::types::JobId;
use poster_core::validation::{decode_image, validate_prompt, InputRule};
use serde::Deserialize;

use crate::staging::{BlobStager, StagingError};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A generation request: prompt plus base64-encoded input images.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitJob {
    pub prompt: String,
    #[serde(default)]
    pub images: Vec<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The submission step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStep {
    Validation,
    Staging,
    Persistence,
    Trigger,
}

impl SubmitStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Staging => "staging",
            Self::Persistence => "persistence",
            Self::Trigger => "trigger",
        }
    }
}

impl fmt::Display for SubmitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Malformed request. No side effects.
    #[error(transparent)]
    Validation(CoreError),

    /// An input write failed. No job record exists.
    #[error(transparent)]
    Staging(#[from] StagingError),

    /// The record write failed after staging. Staged inputs are orphaned.
    #[error("Failed to persist job {job_id}: {source}")]
    Persistence {
        job_id: JobId,
        #[source]
        source: StoreError,
    },

    /// The worker could not be signalled. The record exists but will stay
    /// `processing` until it expires.
    #[error("Failed to trigger worker for job {job_id}: {source}")]
    Trigger {
        job_id: JobId,
        #[source]
        source: TriggerError,
    },
}

impl SubmitError {
    pub fn step(&self) -> SubmitStep {
        match self {
            Self::Validation(_) => SubmitStep::Validation,
            Self::Staging(_) => SubmitStep::Staging,
            Self::Persistence { .. } => SubmitStep::Persistence,
            Self::Trigger { .. } => SubmitStep::Trigger,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Submission entry point.
///
/// Holds no per-job state: concurrent submissions each own their id and
/// artifact keys and never contend.
pub struct JobDispatcher {
    stager: BlobStager,
    store: Arc<dyn JobStore>,
    trigger: Arc<dyn WorkerTrigger>,
    input_rule: InputRule,
}

impl JobDispatcher {
    /// Create a dispatcher accepting any non-zero number of images.
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        store: Arc<dyn JobStore>,
        trigger: Arc<dyn WorkerTrigger>,
    ) -> Self {
        Self {
            stager: BlobStager::new(blobs),
            store,
            trigger,
            input_rule: InputRule::Any,
        }
    }

    /// Require a specific image count on every submission.
    pub fn with_input_rule(mut self, input_rule: InputRule) -> Self {
        self.input_rule = input_rule;
        self
    }

    /// Submit a job and return its id once the worker has been signalled.
    ///
    /// Does not wait for the worker. See [`SubmitError`] for what each
    /// failure leaves behind.
    pub async fn submit(&self, request: SubmitJob) -> Result<JobId, SubmitError> {
        let payloads = self.validate(&request).map_err(SubmitError::Validation)?;

        let job_id = JobId::generate();
        let image_count = payloads.len();
        tracing::info!(job_id = %job_id, image_count, "Submitting generation job");

        let artifacts = self.stager.stage(&job_id, payloads).await.map_err(|e| {
            tracing::error!(job_id = %job_id, index = e.index, error = %e, "Staging failed");
            SubmitError::Staging(e)
        })?;
        let staged_bytes: u64 = artifacts.iter().map(|a| a.size_bytes).sum();
        tracing::debug!(job_id = %job_id, staged_bytes, "All inputs staged");

        let keys = artifacts.into_iter().map(|a| a.key).collect();
        let job = Job::new_processing(job_id.clone(), request.prompt, keys, Utc::now());

        if let Err(source) = self.store.put(&job).await {
            tracing::error!(
                job_id = %job_id,
                error = %source,
                "Failed to persist job record, staged inputs orphaned",
            );
            return Err(SubmitError::Persistence { job_id, source });
        }

        if let Err(source) = self.trigger.notify(&job_id).await {
            tracing::error!(
                job_id = %job_id,
                error = %source,
                "Failed to trigger worker, job will remain processing until expiry",
            );
            return Err(SubmitError::Trigger { job_id, source });
        }

        tracing::info!(job_id = %job_id, expires_at = %job.expires_at, "Generation job started");
        Ok(job_id)
    }

    /// Check the request and decode its images, in submission order.
    fn validate(&self, request: &SubmitJob) -> Result<Vec<Vec<u8>>, CoreError> {
        validate_prompt(&request.prompt)?;
        self.input_rule.check(request.images.len())?;

        request
            .images
            .iter()
            .enumerate()
            .map(|(index, encoded)| decode_image(index, encoded))
            .collect()
    }
}
