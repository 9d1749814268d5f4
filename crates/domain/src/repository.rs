//! Typed access to the record store.

use std::marker::PhantomData;

use common::RecordId;
use store::{Record, RecordQuery, RecordStore, RecordStoreExt};

use crate::entity::Entity;
use crate::error::DomainError;

/// Repository for one entity type on top of a [`RecordStore`].
///
/// The repository is responsible for:
/// 1. Assigning an identifier when an entity is saved for the first time
/// 2. Serializing entities into records of the entity's collection
/// 3. Decoding query results back into entities
pub struct Repository<S, E>
where
    S: RecordStore,
    E: Entity,
{
    store: S,
    _phantom: PhantomData<E>,
}

impl<S, E> Repository<S, E>
where
    S: RecordStore,
    E: Entity,
{
    /// Creates a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists an entity.
    ///
    /// Assigns a fresh identifier on first save, otherwise replaces the
    /// stored record. Returns the entity as stored.
    pub async fn save(&self, mut entity: E) -> Result<E, DomainError> {
        let id = match entity.id() {
            Some(id) => id,
            None => {
                let id = E::Id::from(RecordId::new());
                entity.set_id(id);
                id
            }
        };

        let record = Record::from_value(id.into(), E::collection(), &entity)?;
        let stored = self.store.upsert(record).await?;
        self.decode(stored)
    }

    /// Loads an entity by id, returning None if it doesn't exist.
    pub async fn find_by_id(&self, id: E::Id) -> Result<Option<E>, DomainError> {
        self.store
            .get(E::collection(), id.into())
            .await?
            .map(|record| self.decode(record))
            .transpose()
    }

    /// Loads an entity by id, failing with [`DomainError::NotFound`] if absent.
    pub async fn get(&self, id: E::Id) -> Result<E, DomainError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(E::entity_name(), id))
    }

    /// Removes an entity. Returns false if it did not exist.
    pub async fn delete(&self, id: E::Id) -> Result<bool, DomainError> {
        Ok(self.store.delete(E::collection(), id.into()).await?)
    }

    /// Starts a query over this entity's collection.
    pub fn query(&self) -> RecordQuery {
        RecordQuery::collection(E::collection())
    }

    /// Returns all entities matching the query, in storage order.
    pub async fn find(&self, query: RecordQuery) -> Result<Vec<E>, DomainError> {
        self.store
            .query(query)
            .await?
            .into_iter()
            .map(|record| self.decode(record))
            .collect()
    }

    /// Returns the first entity matching the query, if any.
    pub async fn find_one(&self, query: RecordQuery) -> Result<Option<E>, DomainError> {
        self.store
            .find_one(query)
            .await?
            .map(|record| self.decode(record))
            .transpose()
    }

    /// Checks whether any entity matches the query.
    pub async fn exists(&self, query: RecordQuery) -> Result<bool, DomainError> {
        Ok(self.store.exists(query).await?)
    }

    /// Returns every entity of the collection, in storage order.
    pub async fn all(&self) -> Result<Vec<E>, DomainError> {
        self.find(self.query()).await
    }

    fn decode(&self, record: Record) -> Result<E, DomainError> {
        let mut entity: E = record.payload_as()?;
        entity.set_id(E::Id::from(record.id));
        Ok(entity)
    }
}
