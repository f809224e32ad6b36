use std::sync::Arc;

use poster_core::store::JobStore;
use poster_pipeline::{JobDispatcher, StatusReader};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Submission pipeline (stage → persist → trigger).
    pub dispatcher: Arc<JobDispatcher>,
    /// Polling read path.
    pub status_reader: Arc<StatusReader>,
    /// The job table, for health probing.
    pub job_store: Arc<dyn JobStore>,
}
