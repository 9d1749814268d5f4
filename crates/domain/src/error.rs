//! Domain error types.

use store::StoreError;
use thiserror::Error;

use crate::order::OrderError;
use crate::validation::ValidationError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input failed a field or business-rule check.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An order lifecycle rule was violated.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// An error occurred in the record store.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Builds a [`DomainError::NotFound`] for an entity id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns true for errors caused by the caller's input rather than by
    /// the infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_) | DomainError::NotFound { .. } | DomainError::Order(_)
        )
    }
}
