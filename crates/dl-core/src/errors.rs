//! Cross-cutting error types for DataLink.
//!
//! Domain-specific errors (`DatabaseError`, `ConfigError`) live in their
//! respective crates. Everything converges into `anyhow::Error` in `dl-cli`.

use thiserror::Error;

/// Errors that can be raised by any DataLink crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity or table lookup returned no result.
    #[error("Not found: {kind} '{name}'")]
    NotFound { kind: String, name: String },

    /// Input failed validation (page bounds, unknown labels, etc.).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The session role is below what the operation requires.
    #[error("Access denied: {required} role required (current role: {current})")]
    PermissionDenied { required: String, current: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
