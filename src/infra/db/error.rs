//! Error taxonomy surfaced by the repository.

use rusqlite::ErrorCode;
use rusqlite::ffi::{SQLITE_CONSTRAINT_PRIMARYKEY, SQLITE_CONSTRAINT_UNIQUE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Duplicate,

    #[error("row not exists")]
    NotFound,

    #[error("update failed: no matching row")]
    UpdateFailed,

    #[error("delete failed: no matching row")]
    DeleteFailed,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl RepositoryError {
    /// Classify an insert failure, separating key collisions from other
    /// store errors.
    pub(crate) fn from_insert(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation
                    && matches!(
                        failure.extended_code,
                        SQLITE_CONSTRAINT_PRIMARYKEY | SQLITE_CONSTRAINT_UNIQUE
                    ) =>
            {
                Self::Duplicate
            }
            _ => Self::Store(err),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
