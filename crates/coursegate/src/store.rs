//! Enrollment persistence.
//!
//! The store is the only state that outlives a wizard session: an ordered
//! list of enrollment records, keyed by course id. Inserts are
//! check-then-insert idempotent, which is sufficient here because writes
//! are single-threaded and synchronous from the caller's perspective.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::{Mutex, RwLock};

use coursegate_common::{EnrollError, EnrollmentRecord};

/// Repository interface for enrollment records.
///
/// The wizard never touches ambient storage directly; it talks to this
/// trait so tests can substitute an in-memory fake.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// All records, in insertion order
    async fn list(&self) -> Result<Vec<EnrollmentRecord>, EnrollError>;

    /// Insert the record unless one with the same course id already
    /// exists. Returns true when the record was inserted.
    async fn upsert_if_absent(&self, record: EnrollmentRecord) -> Result<bool, EnrollError>;

    async fn is_enrolled(&self, course_id: u32) -> Result<bool, EnrollError>;

    /// Update the progress of an existing enrollment, touching its
    /// last-accessed timestamp. Unknown ids are ignored.
    async fn update_progress(&self, course_id: u32, progress: u8) -> Result<(), EnrollError>;
}

/// In-memory store for tests and ephemeral embedding
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<EnrollmentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn list(&self) -> Result<Vec<EnrollmentRecord>, EnrollError> {
        Ok(self.records.read().await.clone())
    }

    async fn upsert_if_absent(&self, record: EnrollmentRecord) -> Result<bool, EnrollError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.course_id == record.course_id) {
            return Ok(false);
        }
        records.push(record);
        Ok(true)
    }

    async fn is_enrolled(&self, course_id: u32) -> Result<bool, EnrollError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .any(|r| r.course_id == course_id))
    }

    async fn update_progress(&self, course_id: u32, progress: u8) -> Result<(), EnrollError> {
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.course_id == course_id) {
            record.progress = progress.min(100);
            record.last_accessed = chrono::Utc::now();
        }
        Ok(())
    }
}

/// File-backed store: one JSON document holding the full record list,
/// rewritten on every mutation. The local-storage analog; survives
/// restarts, carries no schema version.
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<EnrollmentRecord>, EnrollError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| EnrollError::Store(format!("corrupt enrollment file: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(EnrollError::Store(e.to_string())),
        }
    }

    async fn write_all(&self, records: &[EnrollmentRecord]) -> Result<(), EnrollError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| EnrollError::Store(e.to_string()))?;
            }
        }
        let data = serde_json::to_vec_pretty(records)
            .map_err(|e| EnrollError::Store(e.to_string()))?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| EnrollError::Store(e.to_string()))
    }
}

#[async_trait]
impl EnrollmentStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<EnrollmentRecord>, EnrollError> {
        self.read_all().await
    }

    async fn upsert_if_absent(&self, record: EnrollmentRecord) -> Result<bool, EnrollError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        if records.iter().any(|r| r.course_id == record.course_id) {
            tracing::debug!(course_id = record.course_id, "already enrolled, skipping");
            return Ok(false);
        }

        let course_id = record.course_id;
        records.push(record);
        self.write_all(&records).await?;

        tracing::info!(course_id = course_id, "enrollment recorded");
        Ok(true)
    }

    async fn is_enrolled(&self, course_id: u32) -> Result<bool, EnrollError> {
        Ok(self
            .read_all()
            .await?
            .iter()
            .any(|r| r.course_id == course_id))
    }

    async fn update_progress(&self, course_id: u32, progress: u8) -> Result<(), EnrollError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        let Some(record) = records.iter_mut().find(|r| r.course_id == course_id) else {
            return Ok(());
        };
        record.progress = progress.min(100);
        record.last_accessed = chrono::Utc::now();

        self.write_all(&records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegate_common::Offering;

    fn offering(id: u32) -> Offering {
        Offering {
            id,
            title: format!("Course {id}"),
            instructor: "Priya Sharma".into(),
            price: "₹5,999".into(),
            original_price: None,
        }
    }

    #[tokio::test]
    async fn memory_store_upsert_is_idempotent() {
        let store = MemoryStore::new();
        let record = EnrollmentRecord::new(&offering(7));

        assert!(store.upsert_if_absent(record.clone()).await.unwrap());
        assert!(!store.upsert_if_absent(record).await.unwrap());

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_id, 7);
    }

    #[tokio::test]
    async fn file_store_round_trips_and_stays_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courseEnrollments.json");

        let store = JsonFileStore::new(&path);
        assert!(store.list().await.unwrap().is_empty());

        let record = EnrollmentRecord::new(&offering(3));
        assert!(store.upsert_if_absent(record.clone()).await.unwrap());
        assert!(!store.upsert_if_absent(record).await.unwrap());

        // A fresh instance reads the same file
        let reopened = JsonFileStore::new(&path);
        let records = reopened.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(reopened.is_enrolled(3).await.unwrap());
        assert!(!reopened.is_enrolled(4).await.unwrap());
    }

    #[tokio::test]
    async fn file_store_updates_progress_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("enrollments.json"));

        store
            .upsert_if_absent(EnrollmentRecord::new(&offering(1)))
            .await
            .unwrap();
        store.update_progress(1, 40).await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records[0].progress, 40);
        assert!(records[0].last_accessed >= records[0].enrolled_at);

        // Unknown ids are ignored, not errors
        store.update_progress(99, 10).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn progress_is_clamped_to_one_hundred() {
        let store = MemoryStore::new();
        store
            .upsert_if_absent(EnrollmentRecord::new(&offering(1)))
            .await
            .unwrap();
        store.update_progress(1, 250).await.unwrap();
        assert_eq!(store.list().await.unwrap()[0].progress, 100);
    }
}
