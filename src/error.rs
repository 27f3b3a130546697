//! Typed failures raised by the persistence layer. The UI decides how each one
//! is presented (empty table, status line, form error) instead of the store
//! swallowing them.

use std::io;
use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The directory that should hold the database file could not be created.
    #[error("failed to create data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite rejected a write because of a NOT NULL or similar constraint.
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StorageError {
    /// Split SQLite constraint violations out of the generic database bucket so
    /// callers can tell bad input apart from an unreachable file.
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
            StorageError::Constraint(err.to_string())
        } else {
            StorageError::Database(err)
        }
    }
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;
