//! Repository for the `generation_jobs` table.
//!
//! Uses `JobStatus` ids from `poster_core::job` for every status literal.
//! `complete` and `fail` are the worker-side write contract.

use poster_core::job::{Job, JobStatus};
use poster_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::job::JobRow;

/// Column list for `generation_jobs` queries.
const COLUMNS: &str = "\
    job_id, status_id, prompt, input_artifact_keys, \
    result_location, error_detail, created_at, expires_at";

/// Provides persistence operations for generation jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert or fully replace the record for `job.id` in one statement.
    pub async fn upsert(pool: &PgPool, job: &Job) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO generation_jobs \
                 (job_id, status_id, prompt, input_artifact_keys, \
                  result_location, error_detail, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (job_id) DO UPDATE SET \
                 status_id = EXCLUDED.status_id, \
                 prompt = EXCLUDED.prompt, \
                 input_artifact_keys = EXCLUDED.input_artifact_keys, \
                 result_location = EXCLUDED.result_location, \
                 error_detail = EXCLUDED.error_detail, \
                 created_at = EXCLUDED.created_at, \
                 expires_at = EXCLUDED.expires_at",
        )
        .bind(job.id.as_str())
        .bind(job.status.id())
        .bind(&job.prompt)
        .bind(&job.input_artifact_keys)
        .bind(&job.result_location)
        .bind(&job.error_detail)
        .bind(job.created_at)
        .bind(job.expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find a job by id. Expired rows are returned until swept.
    pub async fn find_by_id(pool: &PgPool, job_id: &str) -> Result<Option<JobRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generation_jobs WHERE job_id = $1");
        sqlx::query_as::<_, JobRow>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    // -- Worker-side writes ----------------------------------------------------
    //
    // This service never calls these. They are the only sanctioned way for a
    // worker sharing this crate to finish a job: the `status_id` guard makes
    // the processing -> terminal transition happen at most once.

    /// Mark a processing job completed.
    ///
    /// Returns `false` if the job does not exist or is already terminal.
    pub async fn complete(
        pool: &PgPool,
        job_id: &str,
        result_location: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_jobs \
             SET status_id = $2, result_location = $3 \
             WHERE job_id = $1 AND status_id = $4",
        )
        .bind(job_id)
        .bind(JobStatus::Completed.id())
        .bind(result_location)
        .bind(JobStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a processing job failed.
    ///
    /// Returns `false` if the job does not exist or is already terminal.
    pub async fn fail(pool: &PgPool, job_id: &str, error_detail: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_jobs \
             SET status_id = $2, error_detail = $3 \
             WHERE job_id = $1 AND status_id = $4",
        )
        .bind(job_id)
        .bind(JobStatus::Failed.id())
        .bind(error_detail)
        .bind(JobStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every job whose `expires_at` is at or before `now`.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM generation_jobs WHERE expires_at <= $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
