use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use poster_core::error::CoreError;
use poster_core::store::StoreError;
use poster_pipeline::{SubmitError, SubmitStep};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Produces `{ "error", "code" }` JSON bodies. Submission failures also carry
/// `failedStep`, and `jobId` once a record exists.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failed submission, attributed to one pipeline step.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// The submission body could not be read as a job request.
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    /// The job store could not serve a read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Submit(err) => submit_error_response(&err),

            // Body rejections happen before the dispatcher runs, so they
            // belong to the validation step.
            AppError::InvalidBody(rejection) => {
                let (status, code) = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
                } else {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                };
                let body = json!({
                    "error": rejection.body_text(),
                    "code": code,
                    "failedStep": SubmitStep::Validation.as_str(),
                });
                (status, axum::Json(body)).into_response()
            }

            AppError::Store(err) => {
                tracing::error!(error = %err, "Job store read failed");
                plain_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "Job status is temporarily unavailable",
                )
            }

            AppError::BadRequest(msg) => plain_response(StatusCode::BAD_REQUEST, "BAD_REQUEST", &msg),
        }
    }
}

fn plain_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({ "error": message, "code": code });
    (status, axum::Json(body)).into_response()
}

/// Staging, persistence and trigger details stay in the logs; the client only
/// learns which step broke.
fn submit_error_response(err: &SubmitError) -> Response {
    let (status, code, message) = match err {
        SubmitError::Validation(core) => classify_validation(core),
        SubmitError::Staging(e) => {
            tracing::error!(error = %e, "Submission failed while staging inputs");
            (
                StatusCode::BAD_GATEWAY,
                "STAGING_ERROR",
                "Failed to store input images".to_string(),
            )
        }
        SubmitError::Persistence { job_id, source } => {
            tracing::error!(job_id = %job_id, error = %source, "Submission failed while persisting job");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "PERSISTENCE_ERROR",
                "Failed to record the job".to_string(),
            )
        }
        SubmitError::Trigger { job_id, source } => {
            tracing::error!(job_id = %job_id, error = %source, "Submission failed while triggering worker");
            (
                StatusCode::BAD_GATEWAY,
                "TRIGGER_ERROR",
                "Failed to start the generation worker".to_string(),
            )
        }
    };

    let mut body = json!({
        "error": message,
        "code": code,
        "failedStep": err.step().as_str(),
    });
    // The record exists from the trigger step on; it stays pollable until expiry.
    if let SubmitError::Trigger { job_id, .. } = err {
        body["jobId"] = json!(job_id);
    }

    (status, axum::Json(body)).into_response()
}

/// Map a validation-step [`CoreError`] to an HTTP status, code and
/// client-safe message.
fn classify_validation(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(_) | CoreError::Internal(_) => {
            tracing::error!(error = %err, "Unexpected error during request validation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
