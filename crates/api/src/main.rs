use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use poster_api::background;
use poster_api::config::{BackendConfig, ServerConfig};
use poster_api::router::build_app_router;
use poster_api::state::AppState;
use poster_cloud::{HttpWorkerTrigger, S3BlobStore};
use poster_db::PgJobStore;
use poster_pipeline::{JobDispatcher, StatusReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poster_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let backend = BackendConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        bucket = %backend.s3_bucket,
        region = %backend.region,
        input_rule = ?config.input_rule,
        "Loaded server configuration",
    );

    // --- Database ---
    let pool = poster_db::create_pool(&backend.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    poster_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    poster_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let blobs = Arc::new(
        S3BlobStore::connect(backend.region.clone(), backend.s3_bucket.clone()).await,
    );
    let job_store = Arc::new(PgJobStore::new(pool.clone()));
    // Trigger calls must finish inside the HTTP request timeout.
    assert!(
        backend.trigger_timeout_secs < config.request_timeout_secs,
        "TRIGGER_TIMEOUT_SECS must be less than REQUEST_TIMEOUT_SECS",
    );
    let trigger = Arc::new(HttpWorkerTrigger::with_timeout(
        backend.worker_trigger_url.clone(),
        Duration::from_secs(backend.trigger_timeout_secs),
    ));
    tracing::info!(
        endpoint = %trigger.endpoint(),
        timeout_secs = backend.trigger_timeout_secs,
        "Worker trigger configured",
    );

    // --- Pipeline ---
    let dispatcher = JobDispatcher::new(blobs, job_store.clone(), trigger)
        .with_input_rule(config.input_rule);
    let status_reader = StatusReader::new(job_store.clone());

    // --- Expiry sweep ---
    let sweep_cancel = CancellationToken::new();
    let sweep_handle = tokio::spawn(background::job_expiry::run(
        pool.clone(),
        Duration::from_secs(backend.expiry_sweep_secs),
        sweep_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        dispatcher: Arc::new(dispatcher),
        status_reader: Arc::new(status_reader),
        job_store,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(shutdown_timeout, sweep_handle).await;
    tracing::info!("Job expiry sweep stopped");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
