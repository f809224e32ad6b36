//! HTTP worker trigger.
//!
//! Posts `{ "jobId": ... }` to the worker's intake endpoint and treats any
//! 2xx answer (normally `202 Accepted`) as acknowledgement. The response body
//! is never interpreted.
//!
//! Every call is bounded by a client timeout so a stalled worker surfaces as
//! [`TriggerError::Unreachable`] instead of hanging the submission.

use std::time::Duration;

use async_trait::async_trait;
use poster_core::trigger::{TriggerError, TriggerPayload, WorkerTrigger};
use poster_core::types::JobId;

/// Default bound on a single trigger call, connect through response headers.
pub const DEFAULT_TRIGGER_TIMEOUT: Duration = Duration::from_secs(10);

/// Invokes the external worker over HTTP.
pub struct HttpWorkerTrigger {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpWorkerTrigger {
    /// Create a trigger for the given intake URL with
    /// [`DEFAULT_TRIGGER_TIMEOUT`].
    ///
    /// * `endpoint` - Full URL, e.g. `https://worker.internal/jobs`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, DEFAULT_TRIGGER_TIMEOUT)
    }

    /// Create a trigger whose calls give up after `timeout`.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn send_error(&self, err: reqwest::Error) -> TriggerError {
        if err.is_timeout() {
            return TriggerError::Unreachable(format!(
                "no response within {}ms",
                self.timeout.as_millis()
            ));
        }
        TriggerError::Unreachable(err.to_string())
    }
}

#[async_trait]
impl WorkerTrigger for HttpWorkerTrigger {
    async fn notify(&self, job_id: &JobId) -> Result<(), TriggerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&TriggerPayload { job_id })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriggerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(job_id = %job_id, status = status.as_u16(), "Worker acknowledged trigger");
        Ok(())
    }
}
