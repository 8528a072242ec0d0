//! Errors raised while loading or validating DataLink settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider could not be read, or a value has the wrong shape.
    #[error("could not load DataLink settings: {0}")]
    Load(#[from] figment::Error),

    /// `[database]` lacks what is needed to open a connection.
    #[error("database settings incomplete: {missing}")]
    DatabaseIncomplete { missing: &'static str },

    /// A setting is present but not acceptable.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
