use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Page, ReadingStore, StoreError};
use crate::db::models::{NewReading, SensorReading};

/// In-process `ReadingStore` for tests and local demos.
///
/// Cloning shares the underlying rows. Readers never block each other.
#[derive(Clone, Default)]
pub struct MemoryReadingStore {
    rows: Arc<RwLock<Vec<SensorReading>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails until `set_failing(false)`.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// While failing, operations return `StoreError::Unavailable` and leave
    /// the stored rows untouched.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store is in failing mode".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn insert(
        &self,
        reading: NewReading,
        created_at: DateTime<Utc>,
    ) -> Result<SensorReading, StoreError> {
        self.check_available()?;
        let row = reading.into_stored(Uuid::new_v4(), created_at);
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn list(&self, page: Page) -> Result<Vec<SensorReading>, StoreError> {
        self.check_available()?;
        let mut rows = self.rows.read().await.clone();
        // Stable sort: rows with equal timestamps keep insertion order.
        rows.sort_by_key(|r| r.created_at);

        let rows = rows.into_iter().skip(page.offset as usize);
        Ok(match page.limit {
            Some(limit) => rows.take(limit as usize).collect(),
            None => rows.collect(),
        })
    }
}
