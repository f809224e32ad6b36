//! In-memory implementations of the collaborator traits.
//!
//! Suitable for unit tests, HTTP integration tests and local development.
//! Each fake can be told to fail so error paths are reachable without a
//! real outage.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::blob::{BlobError, BlobStore};
use crate::job::Job;
use crate::store::{JobStore, StoreError};
use crate::trigger::{TriggerError, WorkerTrigger};
use crate::types::{JobId, Timestamp};

// ---------------------------------------------------------------------------
// Job store
// ---------------------------------------------------------------------------

/// Hash-map backed [`JobStore`]. Writes are immediately visible to reads.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
    fail_puts: AtomicBool,
    unhealthy: AtomicBool,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail (or succeed again).
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make `health_check` report the store as unreachable (or not).
    pub fn set_healthy(&self, healthy: bool) {
        self.unhealthy.store(!healthy, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Drop every record whose expiry is at or before `now`, mimicking a
    /// store-side TTL sweep. Returns the number removed.
    pub async fn purge_expired(&self, now: Timestamp) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| !job.is_expired_at(now));
        before - jobs.len()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn put(&self, job: &Job) -> Result<(), StoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated write failure".into()));
        }
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

/// An object held by [`InMemoryBlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Hash-map backed [`BlobStore`] with per-key failure injection.
#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    failing_keys: RwLock<HashSet<String>>,
    failing_suffixes: RwLock<Vec<String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes to `key` fail.
    pub async fn fail_key(&self, key: impl Into<String>) {
        self.failing_keys.write().await.insert(key.into());
    }

    /// Make writes to any key ending in `suffix` fail, e.g. `/img_1.jpg` to
    /// reject the second input of every job.
    pub async fn fail_suffix(&self, suffix: impl Into<String>) {
        self.failing_suffixes.write().await.push(suffix.into());
    }

    async fn should_fail(&self, key: &str) -> bool {
        self.failing_keys.read().await.contains(key)
            || self
                .failing_suffixes
                .read()
                .await
                .iter()
                .any(|suffix| key.ends_with(suffix.as_str()))
    }

    pub async fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        if self.should_fail(key).await {
            return Err(BlobError {
                key: key.to_string(),
                reason: "simulated write failure".into(),
            });
        }
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Worker trigger
// ---------------------------------------------------------------------------

/// [`WorkerTrigger`] that records every notified id instead of calling out.
#[derive(Default)]
pub struct RecordingTrigger {
    notified: Mutex<Vec<JobId>>,
    fail: AtomicBool,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Ids notified so far, in call order.
    pub async fn notified(&self) -> Vec<JobId> {
        self.notified.lock().await.clone()
    }
}

#[async_trait]
impl WorkerTrigger for RecordingTrigger {
    async fn notify(&self, job_id: &JobId) -> Result<(), TriggerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TriggerError::Unreachable("simulated trigger failure".into()));
        }
        self.notified.lock().await.push(job_id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::job::JOB_TTL_SECS;

    #[tokio::test]
    async fn job_store_reads_its_own_writes() {
        let store = InMemoryJobStore::new();
        let job = Job::new_processing(JobId::from("j"), "p", vec![], Utc::now());

        store.put(&job).await.unwrap();

        assert_eq!(store.get(&job.id).await.unwrap(), Some(job));
        assert_eq!(store.get(&JobId::from("other")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn job_store_put_can_be_made_to_fail() {
        let store = InMemoryJobStore::new();
        store.set_fail_puts(true);
        let job = Job::new_processing(JobId::from("j"), "p", vec![], Utc::now());

        assert_matches!(store.put(&job).await, Err(StoreError::Unavailable(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn job_store_health_can_be_toggled() {
        let store = InMemoryJobStore::new();
        assert!(store.health_check().await.is_ok());

        store.set_healthy(false);
        assert_matches!(store.health_check().await, Err(StoreError::Unavailable(_)));

        store.set_healthy(true);
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn purge_removes_only_expired_records() {
        let store = InMemoryJobStore::new();
        let now = Utc::now();
        let stale = Job::new_processing(
            JobId::from("old"),
            "p",
            vec![],
            now - Duration::seconds(JOB_TTL_SECS + 1),
        );
        let fresh = Job::new_processing(JobId::from("new"), "p", vec![], now);
        store.put(&stale).await.unwrap();
        store.put(&fresh).await.unwrap();

        assert_eq!(store.purge_expired(now).await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get(&fresh.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn blob_store_fails_only_marked_keys() {
        let blobs = InMemoryBlobStore::new();
        blobs.fail_key("bad").await;

        assert!(blobs.put_object("good", vec![1], "image/jpeg").await.is_ok());
        let err = blobs.put_object("bad", vec![2], "image/jpeg").await.unwrap_err();
        assert_eq!(err.key, "bad");
        assert_eq!(blobs.keys().await, vec!["good".to_string()]);
    }

    #[tokio::test]
    async fn blob_store_fails_marked_suffixes() {
        let blobs = InMemoryBlobStore::new();
        blobs.fail_suffix("/img_1.jpg").await;

        assert!(blobs.put_object("temp/a/img_0.jpg", vec![1], "image/jpeg").await.is_ok());
        assert!(blobs.put_object("temp/a/img_1.jpg", vec![1], "image/jpeg").await.is_err());
        assert!(blobs.put_object("temp/b/img_1.jpg", vec![1], "image/jpeg").await.is_err());
    }

    #[tokio::test]
    async fn recording_trigger_keeps_call_order() {
        let trigger = RecordingTrigger::new();
        trigger.notify(&JobId::from("a")).await.unwrap();
        trigger.notify(&JobId::from("b")).await.unwrap();
        trigger.notify(&JobId::from("a")).await.unwrap();

        assert_eq!(
            trigger.notified().await,
            vec![JobId::from("a"), JobId::from("b"), JobId::from("a")]
        );
    }
}
