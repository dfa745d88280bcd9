//! Database error types for gc-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("no result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in the DB).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
