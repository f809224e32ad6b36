//! [`JobStore`] backed by Postgres.
//!
//! Reads and writes go to the primary through one pool, so a successful
//! `put` is visible to the next `get`.

use async_trait::async_trait;
use poster_core::job::Job;
use poster_core::store::{JobStore, StoreError};
use poster_core::types::JobId;

use crate::repositories::JobRepo;
use crate::DbPool;

#[derive(Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Job store query failed");
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn put(&self, job: &Job) -> Result<(), StoreError> {
        JobRepo::upsert(&self.pool, job).await.map_err(unavailable)
    }

    async fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let row = JobRepo::find_by_id(&self.pool, id.as_str())
            .await
            .map_err(unavailable)?;

        row.map(Job::try_from)
            .transpose()
            .map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(unavailable)
    }
}
