//! `GET /health`, mounted at the root rather than under `/api/v1`.
//!
//! Answers 200 while the job store is reachable and 503 otherwise, so a load
//! balancer can pull an instance whose submissions would fail at persistence.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub store_healthy: bool,
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let probe = state.job_store.health_check().await;
    if let Err(e) = &probe {
        tracing::warn!(error = %e, "Health probe: job store unreachable");
    }
    let store_healthy = probe.is_ok();

    let (code, status) = if store_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store_healthy,
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
