//! Error taxonomy for the persistence gateway
//!
//! Model operations that can fail for reasons other than a raw database error
//! return [`StoreError`], so callers can tell "not there" from "nothing
//! changed" from "the store is broken".

use uuid::Uuid;

/// Persistence result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by entity CRUD primitives
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row with the given id
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A record references a row that does not exist (checked at write time)
    #[error("referenced {entity} with id {id} does not exist")]
    ReferenceNotFound { entity: &'static str, id: Uuid },

    /// An update matched the row but changed nothing
    #[error("update of {entity} {id} affected no rows")]
    NoRowsAffected { entity: &'static str, id: Uuid },

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether this error means the addressed row is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
