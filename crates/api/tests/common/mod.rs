use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use poster_api::config::ServerConfig;
use poster_api::router::build_app_router;
use poster_api::state::AppState;
use poster_core::memory::{InMemoryBlobStore, InMemoryJobStore, RecordingTrigger};
use poster_core::trigger::WorkerTrigger;
use poster_core::validation::InputRule;
use poster_pipeline::{JobDispatcher, StatusReader};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_body_bytes: 1024 * 1024,
        input_rule: InputRule::Any,
    }
}

/// The router plus handles on the in-memory collaborators behind it.
pub struct TestApp {
    pub router: Router,
    pub blobs: Arc<InMemoryBlobStore>,
    pub store: Arc<InMemoryJobStore>,
    pub trigger: Arc<RecordingTrigger>,
}

/// Build the full application router, wired to in-memory fakes.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let store = Arc::new(InMemoryJobStore::new());
    let trigger = Arc::new(RecordingTrigger::new());

    TestApp {
        router: build_router(config, blobs.clone(), store.clone(), trigger.clone()),
        blobs,
        store,
        trigger,
    }
}

/// Wire the production router to in-memory stores and the given trigger.
pub fn build_router(
    config: ServerConfig,
    blobs: Arc<InMemoryBlobStore>,
    store: Arc<InMemoryJobStore>,
    trigger: Arc<dyn WorkerTrigger>,
) -> Router {
    let dispatcher =
        JobDispatcher::new(blobs, store.clone(), trigger).with_input_rule(config.input_rule);

    let state = AppState {
        config: Arc::new(config.clone()),
        dispatcher: Arc::new(dispatcher),
        status_reader: Arc::new(StatusReader::new(store.clone())),
        job_store: store,
    };

    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a raw body and no content type.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
