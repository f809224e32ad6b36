//! Handlers for the `/jobs` resource.
//!
//! Submission returns as soon as the worker has been signalled; clients then
//! poll the status endpoint until the job leaves `processing`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use poster_core::types::JobId;
use poster_pipeline::{StatusView, SubmitJob};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for an accepted submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: JobId,
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Stage the images, record the job and trigger the worker. Returns 202 with
/// the new job id. Failures name the step that broke in `failedStep`,
/// including bodies that do not parse as a job request.
pub async fn submit_job(
    State(state): State<AppState>,
    payload: Result<Json<SubmitJob>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let job_id = state.dispatcher.submit(input).await?;
    Ok((StatusCode::ACCEPTED, Json(SubmitJobResponse { job_id })))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}/status
///
/// Always answers 200 with one of `processing`, `completed`, `failed` or
/// `not_found`; unknown and expired ids are not errors.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<StatusView>> {
    if job_id.trim().is_empty() {
        return Err(AppError::BadRequest("Job id must not be empty".into()));
    }

    let view = state.status_reader.status(&JobId::from(job_id)).await?;
    Ok(Json(view))
}
