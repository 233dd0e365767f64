use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors surfaced by catalog reads, writes and queries.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Invalid query parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Product {id} is missing its {field}")]
    DataIntegrity { id: u64, field: &'static str },
    #[error("Product validation error: {0}")]
    Validation(String),
    #[error("Product repository error: {0}")]
    Repository(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl CatalogError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<FrameworkError> for CatalogError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => CatalogError::NotFound(id),
            FrameworkError::Validation(msg) => CatalogError::Validation(msg),
            FrameworkError::Repository(msg) => CatalogError::Repository(msg),
            other @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                CatalogError::ActorCommunicationError(other.to_string())
            }
        }
    }
}
