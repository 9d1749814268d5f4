use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::RecordId;

/// A stored document together with its storage metadata.
///
/// The payload is the serialized entity. Records are grouped by collection
/// name (e.g. "customers", "orders") and keyed by [`RecordId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier of the record.
    pub id: RecordId,

    /// The collection this record belongs to.
    pub collection: String,

    /// The serialized document.
    pub payload: serde_json::Value,

    /// When the record was first stored.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a new record with the current time as both timestamps.
    pub fn new(
        id: RecordId,
        collection: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            collection: collection.into(),
            payload,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a record by serializing a value as its payload.
    pub fn from_value<T: Serialize>(
        id: RecordId,
        collection: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(id, collection, serde_json::to_value(value)?))
    }

    /// Deserializes the payload into a typed value.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// Returns the payload field with the given name, if present.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.payload.get(name)
    }
}
