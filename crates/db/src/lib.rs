//! Postgres persistence for generation job records.
//!
//! [`PgJobStore`] implements [`poster_core::store::JobStore`] on top of the
//! `generation_jobs` table; [`repositories::JobRepo`] holds the raw queries,
//! including the expiry sweep that stands in for a native TTL.

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgJobStore;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
