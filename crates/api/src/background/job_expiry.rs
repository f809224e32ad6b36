//! Periodic purge of expired job records.
//!
//! Postgres has no native row TTL, so this loop plays the part of the
//! store's expiry sweep: every `interval` it deletes rows whose `expires_at`
//! has passed. The status reader already treats such rows as `not_found`,
//! so sweep timing is never observable to clients.

use std::time::Duration;

use chrono::Utc;
use poster_db::repositories::JobRepo;
use poster_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Run the expiry sweep loop until `cancel` is triggered.
pub async fn run(pool: DbPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Job expiry sweep started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Job expiry sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                match JobRepo::delete_expired(&pool, Utc::now()).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Job expiry sweep: purged expired jobs");
                    }
                    Ok(_) => {
                        tracing::debug!("Job expiry sweep: nothing to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Job expiry sweep: cleanup failed");
                    }
                }
            }
        }
    }
}
