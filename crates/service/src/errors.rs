use thiserror::Error;

use models::errors::ModelError;
use models::Collection;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn missing(collection: Collection) -> Self { Self::not_found(collection.entity()) }

    /// Message safe to hand to an HTTP caller.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(m) | ServiceError::NotFound(m) | ServiceError::Conflict(m) => m.clone(),
            ServiceError::Storage(_) | ServiceError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(m) => ServiceError::Validation(m),
            ModelError::Encode(m) => ServiceError::Internal(m),
        }
    }
}
