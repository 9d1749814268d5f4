use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{Record, RecordId, RecordQuery, Result, store::RecordStore};

/// In-memory record store implementation for testing and development.
///
/// Records live in a single vector so queries return them in insertion
/// order, matching the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Vec<Record>>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of records across all collections.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Clears all records.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn upsert(&self, mut record: Record) -> Result<Record> {
        let mut store = self.records.write().await;

        let existing = store
            .iter_mut()
            .find(|r| r.collection == record.collection && r.id == record.id);

        match existing {
            Some(slot) => {
                record.created_at = slot.created_at;
                record.updated_at = Utc::now();
                *slot = record.clone();
            }
            None => store.push(record.clone()),
        }

        Ok(record)
    }

    async fn get(&self, collection: &str, id: RecordId) -> Result<Option<Record>> {
        let store = self.records.read().await;
        Ok(store
            .iter()
            .find(|r| r.collection == collection && r.id == id)
            .cloned())
    }

    async fn delete(&self, collection: &str, id: RecordId) -> Result<bool> {
        let mut store = self.records.write().await;
        let before = store.len();
        store.retain(|r| !(r.collection == collection && r.id == id));
        Ok(store.len() < before)
    }

    async fn query(&self, query: RecordQuery) -> Result<Vec<Record>> {
        let store = self.records.read().await;
        let matching = store.iter().filter(|r| query.matches(r)).cloned();

        // Apply offset and limit
        let offset = query.offset.unwrap_or(0);
        let records = match query.limit {
            Some(limit) => matching.skip(offset).take(limit).collect(),
            None => matching.skip(offset).collect(),
        };

        Ok(records)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let store = self.records.read().await;
        Ok(store.iter().filter(|r| r.collection == collection).count())
    }
}
