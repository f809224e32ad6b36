//! Integration tests for the Postgres job store.
//!
//! Exercises the repository and `JobStore` implementation against a real
//! database:
//! - read-after-write on `put`
//! - full replacement on re-`put`
//! - guarded terminal transitions
//! - expiry sweep

use chrono::{Duration, Utc};
use poster_core::job::{Job, JobStatus, JOB_TTL_SECS};
use poster_core::store::JobStore;
use poster_core::types::JobId;
use poster_db::repositories::JobRepo;
use poster_db::PgJobStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_job(id: &str) -> Job {
    Job::new_processing(
        JobId::from(id),
        "hello",
        vec![
            format!("temp/{id}/img_0.jpg"),
            format!("temp/{id}/img_1.jpg"),
            format!("temp/{id}/img_2.jpg"),
        ],
        Utc::now(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn put_is_visible_to_immediate_get(pool: PgPool) {
    let store = PgJobStore::new(pool);
    let job = new_job("J");

    store.put(&job).await.unwrap();
    let found = store.get(&job.id).await.unwrap().expect("job should exist");

    assert_eq!(found.status, JobStatus::Processing);
    assert_eq!(found.input_artifact_keys, job.input_artifact_keys);
    assert_eq!(found.created_at.timestamp(), job.created_at.timestamp());
    assert_eq!(found.expires_at.timestamp(), job.expires_at.timestamp());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_id_returns_none(pool: PgPool) {
    let store = PgJobStore::new(pool);
    assert!(store.get(&JobId::from("unknown-id")).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_put_replaces_record(pool: PgPool) {
    let store = PgJobStore::new(pool);
    let mut job = new_job("J");
    store.put(&job).await.unwrap();

    job.complete("https://x/out.png").unwrap();
    store.put(&job).await.unwrap();

    let found = store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(found.status, JobStatus::Completed);
    assert_eq!(found.result_location.as_deref(), Some("https://x/out.png"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn terminal_transition_happens_once(pool: PgPool) {
    let store = PgJobStore::new(pool.clone());
    store.put(&new_job("J")).await.unwrap();

    assert!(JobRepo::complete(&pool, "J", "https://x/out.png").await.unwrap());
    assert!(!JobRepo::fail(&pool, "J", "too late").await.unwrap());
    assert!(!JobRepo::complete(&pool, "missing", "https://x/out.png").await.unwrap());

    let found = store.get(&JobId::from("J")).await.unwrap().unwrap();
    assert_eq!(found.status, JobStatus::Completed);
    assert!(found.error_detail.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_expired_removes_only_stale_rows(pool: PgPool) {
    let store = PgJobStore::new(pool.clone());
    let now = Utc::now();

    let stale = Job::new_processing(
        JobId::from("old"),
        "hello",
        vec![],
        now - Duration::seconds(JOB_TTL_SECS + 1),
    );
    store.put(&stale).await.unwrap();
    store.put(&new_job("fresh")).await.unwrap();

    let deleted = JobRepo::delete_expired(&pool, now).await.unwrap();

    assert_eq!(deleted, 1);
    assert!(store.get(&JobId::from("old")).await.unwrap().is_none());
    assert!(store.get(&JobId::from("fresh")).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_succeeds(pool: PgPool) {
    let store = PgJobStore::new(pool);
    store.health_check().await.unwrap();
}
