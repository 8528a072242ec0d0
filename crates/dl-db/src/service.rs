//! Service layer tying the database handle to the operator identity.
//!
//! `DataLinkService` wraps `DataLinkDb` and the name recorded as
//! `changed_by` on audit entries. All repo methods are implemented as
//! `impl DataLinkService` blocks.

use dl_config::DataLinkConfig;

use crate::DataLinkDb;
use crate::error::DatabaseError;

pub struct DataLinkService {
    db: DataLinkDb,
    changed_by: String,
}

impl DataLinkService {
    /// Open a local database (no sample data) acting as `changed_by`.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `changed_by` - Operator name written to the audit log.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, changed_by: &str) -> Result<Self, DatabaseError> {
        let db = DataLinkDb::open_local(db_path).await?;
        Ok(Self::from_db(db, changed_by))
    }

    /// Open the configured database as the configured session user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if opening, migrating, or seeding fails.
    pub async fn from_config(config: &DataLinkConfig) -> Result<Self, DatabaseError> {
        let db = DataLinkDb::open(&config.database).await?;
        Ok(Self::from_db(db, &config.session.user))
    }

    #[must_use]
    pub fn from_db(db: DataLinkDb, changed_by: &str) -> Self {
        Self {
            db,
            changed_by: changed_by.to_string(),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DataLinkDb {
        &self.db
    }

    #[must_use]
    pub fn changed_by(&self) -> &str {
        &self.changed_by
    }
}
