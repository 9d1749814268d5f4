use async_trait::async_trait;

use crate::{Record, RecordId, RecordQuery, Result};

/// Core trait for record store implementations.
///
/// A record store persists JSON documents keyed by collection and id.
/// Every single-record write is atomic. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a record, or replaces the record with the same id.
    ///
    /// A replaced record keeps its original storage position and
    /// `created_at`; `updated_at` is refreshed. Returns the record as stored.
    async fn upsert(&self, record: Record) -> Result<Record>;

    /// Retrieves a record by collection and id.
    async fn get(&self, collection: &str, id: RecordId) -> Result<Option<Record>>;

    /// Removes a record. Returns false if it did not exist.
    async fn delete(&self, collection: &str, id: RecordId) -> Result<bool>;

    /// Retrieves records matching a query, in storage (insertion) order.
    async fn query(&self, query: RecordQuery) -> Result<Vec<Record>>;

    /// Counts the records of a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}

/// Extension trait providing convenience methods for record stores.
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Returns the first record matching the query, if any.
    async fn find_one(&self, query: RecordQuery) -> Result<Option<Record>> {
        Ok(self.query(query.limit(1)).await?.into_iter().next())
    }

    /// Checks whether any record matches the query.
    async fn exists(&self, query: RecordQuery) -> Result<bool> {
        Ok(self.find_one(query).await?.is_some())
    }
}

// Blanket implementation for all RecordStore implementations
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}
