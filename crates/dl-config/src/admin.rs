//! Database-admin module configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Page sizes offered by the table browser.
pub const PAGE_SIZES: &[u32] = &[10, 25, 50, 100];

const fn default_allow_destructive_sql() -> bool {
    true
}

const fn default_page_size() -> u32 {
    25
}

fn default_backup_tables() -> Vec<String> {
    ["customers", "chart_of_accounts", "invoices"]
        .iter()
        .map(|t| (*t).to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Let the SQL console run `DROP`/`DELETE`/`UPDATE`/... statements.
    #[serde(default = "default_allow_destructive_sql")]
    pub allow_destructive_sql: bool,

    /// Rows per page when `browse` is called without `--page-size`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Tables written by `backup` when none are named.
    #[serde(default = "default_backup_tables")]
    pub backup_tables: Vec<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            allow_destructive_sql: default_allow_destructive_sql(),
            default_page_size: default_page_size(),
            backup_tables: default_backup_tables(),
        }
    }
}

impl AdminConfig {
    /// # Errors
    ///
    /// `InvalidValue` when `default_page_size` is not one of [`PAGE_SIZES`]
    /// or `backup_tables` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PAGE_SIZES.contains(&self.default_page_size) {
            return Err(ConfigError::InvalidValue {
                field: "admin.default_page_size".to_string(),
                reason: format!(
                    "{} is not one of {PAGE_SIZES:?}",
                    self.default_page_size
                ),
            });
        }
        if self.backup_tables.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "admin.backup_tables".to_string(),
                reason: "at least one table is required".to_string(),
            });
        }
        Ok(())
    }
}
