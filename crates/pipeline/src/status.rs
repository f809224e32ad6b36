//! Read-only polling path for job status.

use std::sync::Arc;

use chrono::Utc;
use poster_core::job::JobStatus;
use poster_core::store::{JobStore, StoreError};
use poster_core::types::JobId;
use serde::Serialize;

/// Status as reported to a polling client.
///
/// Adds `not_found` to the stored states: the id never existed, or its
/// record has expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportedStatus {
    Processing,
    Completed,
    Failed,
    NotFound,
}

impl From<JobStatus> for ReportedStatus {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Processing => Self::Processing,
            JobStatus::Completed => Self::Completed,
            JobStatus::Failed => Self::Failed,
        }
    }
}

/// Response body for a status poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub status: ReportedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_location: Option<String>,
}

impl StatusView {
    pub fn not_found() -> Self {
        Self {
            status: ReportedStatus::NotFound,
            result_location: None,
        }
    }
}

/// Answers "what state is job X in?" without touching anything.
pub struct StatusReader {
    store: Arc<dyn JobStore>,
}

impl StatusReader {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Look up the current status of `id`.
    ///
    /// Unknown ids and records past `expires_at` (whether or not the store
    /// has swept them yet) both report `not_found`. Only a store failure is
    /// an error.
    pub async fn status(&self, id: &JobId) -> Result<StatusView, StoreError> {
        let Some(job) = self.store.get(id).await? else {
            return Ok(StatusView::not_found());
        };

        if job.is_expired_at(Utc::now()) {
            tracing::debug!(job_id = %id, expires_at = %job.expires_at, "Job record expired");
            return Ok(StatusView::not_found());
        }

        let result_location = match job.status {
            JobStatus::Completed => job.result_location,
            JobStatus::Processing | JobStatus::Failed => None,
        };

        Ok(StatusView {
            status: job.status.into(),
            result_location,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use poster_core::job::{Job, JOB_TTL_SECS};
    use poster_core::memory::InMemoryJobStore;

    use super::*;

    fn reader() -> (StatusReader, Arc<InMemoryJobStore>) {
        let store = Arc::new(InMemoryJobStore::new());
        (StatusReader::new(store.clone()), store)
    }

    fn job(id: &str) -> Job {
        Job::new_processing(JobId::from(id), "hello", vec!["temp/x/img_0.jpg".into()], Utc::now())
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (reader, _) = reader();
        let view = reader.status(&JobId::from("unknown-id")).await.unwrap();
        assert_eq!(view, StatusView::not_found());
    }

    #[tokio::test]
    async fn processing_job_has_no_location() {
        let (reader, store) = reader();
        store.put(&job("J")).await.unwrap();

        let view = reader.status(&JobId::from("J")).await.unwrap();
        assert_eq!(view.status, ReportedStatus::Processing);
        assert_eq!(view.result_location, None);
    }

    #[tokio::test]
    async fn completed_job_reports_result_location() {
        let (reader, store) = reader();
        let mut j = job("J");
        store.put(&j).await.unwrap();

        // Simulated worker write.
        j.complete("https://x/out.png").unwrap();
        store.put(&j).await.unwrap();

        let view = reader.status(&JobId::from("J")).await.unwrap();
        assert_eq!(view.status, ReportedStatus::Completed);
        assert_eq!(view.result_location.as_deref(), Some("https://x/out.png"));
    }

    #[tokio::test]
    async fn failed_job_is_distinct_from_not_found() {
        let (reader, store) = reader();
        let mut j = job("J");
        j.fail("generation error").unwrap();
        store.put(&j).await.unwrap();

        let view = reader.status(&JobId::from("J")).await.unwrap();
        assert_eq!(view.status, ReportedStatus::Failed);
        assert_eq!(view.result_location, None);
    }

    #[tokio::test]
    async fn unswept_expired_record_is_not_found() {
        let (reader, store) = reader();
        let stale = Job::new_processing(
            JobId::from("old"),
            "hello",
            vec![],
            Utc::now() - Duration::seconds(JOB_TTL_SECS + 60),
        );
        store.put(&stale).await.unwrap();

        let view = reader.status(&JobId::from("old")).await.unwrap();
        assert_eq!(view.status, ReportedStatus::NotFound);
    }

    #[test]
    fn view_serializes_to_wire_shape() {
        let view = StatusView {
            status: ReportedStatus::Completed,
            result_location: Some("https://x/out.png".into()),
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({ "status": "completed", "resultLocation": "https://x/out.png" })
        );
        assert_eq!(
            serde_json::to_value(StatusView::not_found()).unwrap(),
            serde_json::json!({ "status": "not_found" })
        );
    }
}
