//! Database error types for dl-db.

use dl_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The database could not be opened or connected to.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// A SQL query failed. Carries the driver's message unchanged.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A table, column, or record does not exist.
    #[error("Not found: {kind} '{name}'")]
    NotFound { kind: String, name: String },

    /// Caller input failed validation (page bounds, empty statement, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The execution policy refused the statement.
    #[error("Statement refused: {0}")]
    Refused(String),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(kind: &str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.into(),
        }
    }
}
