use sea_orm::error::SqlErr;
use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

/// Errors surfaced by the catalog services. The HTTP layer owns the
/// translation into user-facing responses.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Caller-supplied data violates a field constraint.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A referenced id does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A uniqueness policy rejected the write.
    #[error("{0}")]
    Conflict(String),

    /// Underlying store failure.
    #[error("storage error: {0}")]
    Persistence(#[from] DbErr),
}

impl CatalogError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CatalogError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CatalogError::NotFound { entity, id }
    }

    /// True when the error is the store rejecting a duplicate key. Unique
    /// violations on the join table mean "already present", and on the
    /// playlist name index they mean a name conflict.
    pub fn is_unique_violation(err: &DbErr) -> bool {
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}

impl From<TransactionError<CatalogError>> for CatalogError {
    fn from(err: TransactionError<CatalogError>) -> Self {
        match err {
            TransactionError::Connection(e) => CatalogError::Persistence(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
