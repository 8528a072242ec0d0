//! Sample business data for a fresh database.

use tracing::{debug, info};

use crate::DataLinkDb;
use crate::error::DatabaseError;
use crate::helpers::get_i64;

const SAMPLE_DATA: &str = include_str!("../seeds/sample_data.sql");

impl DataLinkDb {
    /// Insert the sample customers, accounts, inventory, employees, and
    /// projects, unless `customers` already has rows.
    ///
    /// Returns whether anything was inserted. The whole batch commits or
    /// rolls back together.
    pub(crate) async fn seed_sample_data(&self) -> Result<bool, DatabaseError> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM customers", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        if get_i64(&row, 0)? > 0 {
            debug!("customers not empty, skipping sample data");
            return Ok(false);
        }

        let tx = self.conn.transaction().await?;
        if let Err(e) = tx.execute_batch(SAMPLE_DATA).await {
            tx.rollback().await?;
            return Err(DatabaseError::Migration(format!("sample data: {e}")));
        }
        tx.commit().await?;
        info!("inserted sample business data");
        Ok(true)
    }
}
