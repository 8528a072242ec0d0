//! # dl-config
//!
//! Layered configuration loading for DataLink using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DATALINK_*` prefix, `__` as separator)
//! 2. `DATABASE_URL` (mapped to `database.url`)
//! 3. Project-level `.datalink/config.toml`
//! 4. User-level `~/.config/datalink/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DATALINK_DATABASE__URL` -> `database.url`,
//! `DATALINK_ADMIN__DEFAULT_PAGE_SIZE` -> `admin.default_page_size`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use dl_config::DataLinkConfig;
//!
//! let config = DataLinkConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.url);
//! ```

mod admin;
mod database;
mod error;
mod kpi;
mod session;

pub use admin::{AdminConfig, PAGE_SIZES};
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use kpi::KpiConfig;
pub use session::SessionConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".datalink/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataLinkConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub kpi: KpiConfig,
}

impl DataLinkConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` when a source cannot be parsed and
    /// `ConfigError::InvalidValue` when a value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: conventional DATABASE_URL
        figment = figment.merge(
            Env::raw()
                .only(&["DATABASE_URL"])
                .map(|_| "database.url".into()),
        );

        // Layer 4: DATALINK_* (highest priority)
        figment.merge(Env::prefixed("DATALINK_").split("__"))
    }

    /// Path to the user-global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("datalink").join("config.toml"))
    }

    /// # Errors
    ///
    /// `InvalidValue` for an unsupported page size, an empty backup
    /// selection, or an unknown session role.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.admin.validate()?;
        self.session.role()?;
        Ok(())
    }
}
