//! Row model for the `generation_jobs` table.

use poster_core::error::CoreError;
use poster_core::job::{Job, JobStatus};
use poster_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `generation_jobs` table.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub job_id: String,
    pub status_id: i16,
    pub prompt: String,
    pub input_artifact_keys: Vec<String>,
    pub result_location: Option<String>,
    pub error_detail: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl TryFrom<JobRow> for Job {
    type Error = CoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.job_id.into(),
            status: JobStatus::from_id(row.status_id)?,
            prompt: row.prompt,
            input_artifact_keys: row.input_artifact_keys,
            created_at: row.created_at,
            expires_at: row.expires_at,
            result_location: row.result_location,
            error_detail: row.error_detail,
        })
    }
}
