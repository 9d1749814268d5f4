//! Persistence gateway for the delivery backend.
//!
//! Records are JSON documents grouped into named collections and keyed by
//! [`RecordId`]. Two implementations share the [`RecordStore`] trait: an
//! in-memory store for tests and development, and a PostgreSQL store.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::RecordId;
pub use error::{Result, StoreError};
pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use query::{Filter, RecordQuery};
pub use record::Record;
pub use store::{RecordStore, RecordStoreExt};
