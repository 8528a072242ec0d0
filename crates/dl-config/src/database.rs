//! Database connection configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_url() -> String {
    "datalink.db".to_string()
}

const fn default_seed_sample_data() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local file path, `:memory:`, or a remote `libsql://` / `https://` URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Auth token for remote databases.
    #[serde(default)]
    pub auth_token: String,

    /// Insert the sample business records when `customers` is empty on first open.
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth_token: String::new(),
            seed_sample_data: default_seed_sample_data(),
        }
    }
}

impl DatabaseConfig {
    /// Whether `url` points at a remote libSQL server.
    pub fn is_remote(&self) -> bool {
        ["libsql://", "http://", "https://", "wss://", "ws://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }

    /// Check the fields required to open the configured database.
    ///
    /// # Errors
    ///
    /// `DatabaseIncomplete` when the URL is empty or a remote URL has no
    /// auth token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::DatabaseIncomplete { missing: "url" });
        }
        if self.is_remote() && self.auth_token.is_empty() {
            return Err(ConfigError::DatabaseIncomplete {
                missing: "auth_token (required for remote URLs)",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_local_and_seeded() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, "datalink.db");
        assert!(config.seed_sample_data);
        assert!(!config.is_remote());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn remote_url_detection() {
        let config = DatabaseConfig {
            url: "libsql://datalink-acme.turso.io".into(),
            ..Default::default()
        };
        assert!(config.is_remote());
    }

    #[test]
    fn remote_without_token_is_incomplete() {
        let mut config = DatabaseConfig {
            url: "https://db.example.com".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DatabaseIncomplete { missing }) if missing.starts_with("auth_token")
        ));

        config.auth_token = "token".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_url_is_incomplete() {
        let config = DatabaseConfig {
            url: "  ".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "database settings incomplete: url");
    }
}
