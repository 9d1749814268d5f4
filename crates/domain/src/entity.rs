//! Core entity trait.

use std::fmt::{Debug, Display};

use common::RecordId;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for records persisted through a [`Repository`](crate::Repository).
///
/// An entity is stored as a JSON document in its own collection. It carries
/// no identifier until it is saved for the first time.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The typed identifier of this entity.
    type Id: Copy + Debug + Display + Into<RecordId> + From<RecordId> + Send + Sync;

    /// Returns the collection name used by the record store.
    fn collection() -> &'static str;

    /// Returns the human-readable entity name used in error messages.
    fn entity_name() -> &'static str;

    /// Returns the entity's identifier.
    ///
    /// Returns None for an entity that has never been saved.
    fn id(&self) -> Option<Self::Id>;

    /// Sets the identifier.
    ///
    /// Called by the repository on first save and when decoding records.
    fn set_id(&mut self, id: Self::Id);
}
