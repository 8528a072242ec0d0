//! # dl-db
//!
//! libSQL storage for DataLink.
//!
//! Owns the business schema (embedded migration plus optional sample data)
//! and every operation that touches it: schema introspection, paginated
//! browsing, the ad-hoc SQL console, metric aggregation, JSON backup and
//! restore, typed record inserts/updates, and the audit log.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29). A local file, an
//! in-memory database, or a remote `libsql://` server all go through the same
//! connection type.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
mod seed;
pub mod service;

use dl_config::DatabaseConfig;
use error::DatabaseError;
use libsql::Builder;
use tracing::debug;

pub use service::DataLinkService;

/// Database handle: one libSQL database and the connection every operation borrows.
pub struct DataLinkDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl DataLinkDb {
    /// Open a local database file, or `":memory:"`.
    ///
    /// Runs migrations automatically. Sample data is not inserted; see
    /// [`Self::open`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("{path}: {e}")))?;
        Self::init(db).await
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("{url}: {e}")))?;
        Self::init(db).await
    }

    /// Open whatever `config` points at and insert sample data when enabled
    /// and `customers` is empty.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` for an incomplete remote config,
    /// or any error from opening, migrating, or seeding.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        config
            .validate()
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = if config.is_remote() {
            Self::open_remote(&config.url, &config.auth_token).await?
        } else {
            Self::open_local(&config.url).await?
        };

        if config.seed_sample_data {
            db.seed_sample_data().await?;
        }
        Ok(db)
    }

    async fn init(db: libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let handle = Self { db, conn };
        handle.run_migrations().await?;
        debug!("database opened and migrated");
        Ok(handle)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
