use thiserror::Error;

use catalog_core::catalog::ProductError;
use catalog_core::storage::RepositoryError;

/// Errors returned by `ProductService`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Product not found: {id}")]
    NotFound { id: i64 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ProductError> for ServiceError {
    fn from(err: ProductError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl ServiceError {
    /// Maps a store-level "not found" for `id` to `ServiceError::NotFound`.
    pub(crate) fn from_repository(err: RepositoryError, id: i64) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound { id },
            other => Self::Repository(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
