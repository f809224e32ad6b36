//! Job record and artifact models.
//!
//! A [`Job`] is created once by the dispatcher in `processing` state and is
//! afterwards mutated only by the external worker, which moves it to a
//! terminal state exactly once.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{JobId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lifetime of a job record before the store may purge it (24 hours).
pub const JOB_TTL_SECS: i64 = 86_400;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Stored job status.
///
/// `not_found` is deliberately absent: it is a read-path answer, never a
/// persisted state. Discriminants match the `job_statuses` seed rows.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing = 1,
    Completed = 2,
    Failed = 3,
}

impl JobStatus {
    /// Return the database status ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Parse from the database status ID.
    pub fn from_id(id: i16) -> Result<Self, CoreError> {
        match id {
            1 => Ok(Self::Processing),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Failed),
            other => Err(CoreError::Internal(format!("Unknown job status id {other}"))),
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// A persisted generation job.
///
/// Serializes to the record shape the worker reads:
/// `{ jobId, status, prompt, inputArtifactKeys, createdAt, expiresAt }` with
/// epoch-second timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "jobId")]
    pub id: JobId,
    pub status: JobStatus,
    pub prompt: String,
    /// Staged input keys, positionally paired with the submitted images.
    pub input_artifact_keys: Vec<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    /// The store may purge the record any time after this instant.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl Job {
    /// Build a fresh `processing` record expiring [`JOB_TTL_SECS`] after `now`.
    pub fn new_processing(
        id: JobId,
        prompt: impl Into<String>,
        input_artifact_keys: Vec<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            status: JobStatus::Processing,
            prompt: prompt.into(),
            input_artifact_keys,
            created_at: now,
            expires_at: now + chrono::Duration::seconds(JOB_TTL_SECS),
            result_location: None,
            error_detail: None,
        }
    }

    /// Whether the record is past its expiry at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Move the job to `completed` with the location of the generated output.
    pub fn complete(&mut self, result_location: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_processing()?;
        self.status = JobStatus::Completed;
        self.result_location = Some(result_location.into());
        Ok(())
    }

    /// Move the job to `failed` with a human-readable reason.
    pub fn fail(&mut self, error_detail: impl Into<String>) -> Result<(), CoreError> {
        self.ensure_processing()?;
        self.status = JobStatus::Failed;
        self.error_detail = Some(error_detail.into());
        Ok(())
    }

    fn ensure_processing(&self) -> Result<(), CoreError> {
        if self.status.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Job {} is already {} and cannot change state",
                self.id,
                self.status.as_str()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// An input object written to the staging bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub key: String,
    pub content_type: String,
    pub size_bytes: u64,
}
