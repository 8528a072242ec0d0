//! Operator identity used for the CLI session.

use dl_core::enums::Role;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_user() -> String {
    "admin".to_string()
}

fn default_role() -> String {
    "Admin".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Recorded as `changed_by` on audit entries.
    #[serde(default = "default_user")]
    pub user: String,

    /// One of `User`, `Analyst`, `Manager`, `Admin`.
    #[serde(default = "default_role")]
    pub role: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            role: default_role(),
        }
    }
}

impl SessionConfig {
    /// Parse the configured role.
    ///
    /// # Errors
    ///
    /// `InvalidValue` when `role` is not a known role label.
    pub fn role(&self) -> Result<Role, ConfigError> {
        self.role
            .parse::<Role>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "session.role".to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_admin() {
        let config = SessionConfig::default();
        assert_eq!(config.user, "admin");
        assert_eq!(config.role().unwrap(), Role::Admin);
    }

    #[test]
    fn role_is_case_insensitive() {
        let config = SessionConfig {
            role: "analyst".into(),
            ..Default::default()
        };
        assert_eq!(config.role().unwrap(), Role::Analyst);
    }

    #[test]
    fn unknown_role_is_invalid() {
        let config = SessionConfig {
            role: "root".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.role(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
