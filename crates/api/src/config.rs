use poster_core::validation::InputRule;

/// HTTP server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener closes (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum request body size in bytes (default: 25 MiB). Submissions
    /// carry base64 images inline, so this is well above axum's default.
    pub max_body_bytes: usize,
    /// Required image count per submission (default: any, at least one).
    pub input_rule: InputRule,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `MAX_BODY_BYTES`       | `26214400`                 |
    /// | `REQUIRED_IMAGE_COUNT` | unset (`3` or `3-6` forms) |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let input_rule = InputRule::parse(std::env::var("REQUIRED_IMAGE_COUNT").ok().as_deref())
            .unwrap_or_else(|e| panic!("REQUIRED_IMAGE_COUNT is invalid: {e}"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_body_bytes,
            input_rule,
        }
    }
}

/// Connection settings for the external collaborators.
///
/// Every field is required; startup fails naming the first missing variable.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Postgres URL for the job table (`DATABASE_URL`).
    pub database_url: String,
    /// Staging bucket for input images (`S3_BUCKET_NAME`).
    pub s3_bucket: String,
    /// AWS region (`AWS_REGION`, falling back to `REGION`).
    pub region: String,
    /// Worker intake endpoint (`WORKER_TRIGGER_URL`).
    pub worker_trigger_url: String,
    /// Bound on one worker trigger call in seconds (`TRIGGER_TIMEOUT_SECS`,
    /// default `10`). Must stay below `REQUEST_TIMEOUT_SECS`.
    pub trigger_timeout_secs: u64,
    /// Expiry sweep interval in seconds (`JOB_EXPIRY_SWEEP_SECS`, default `3600`).
    pub expiry_sweep_secs: u64,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let s3_bucket = std::env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME must be set");
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("REGION"))
            .expect("AWS_REGION or REGION must be set");
        let worker_trigger_url =
            std::env::var("WORKER_TRIGGER_URL").expect("WORKER_TRIGGER_URL must be set");

        let trigger_timeout_secs: u64 = std::env::var("TRIGGER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("TRIGGER_TIMEOUT_SECS must be a valid u64");

        let expiry_sweep_secs: u64 = std::env::var("JOB_EXPIRY_SWEEP_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("JOB_EXPIRY_SWEEP_SECS must be a valid u64");

        Self {
            database_url,
            s3_bucket,
            region,
            worker_trigger_url,
            trigger_timeout_secs,
            expiry_sweep_secs,
        }
    }
}
