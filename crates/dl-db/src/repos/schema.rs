//! Schema introspection from the `SQLite` catalog.
//!
//! Table names reach SQL text only after they have been matched against
//! [`DataLinkService::list_tables`], and then only as quoted identifiers.

use tracing::{debug, warn};

use dl_core::responses::{ColumnInfo, TableSummary};

use crate::error::DatabaseError;
use crate::helpers::{get_i64, get_opt_string, get_string, quote_ident};
use crate::service::DataLinkService;

impl DataLinkService {
    /// Base-table names in name order, excluding engine-internal tables.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the catalog query fails.
    pub async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table'
                   AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
                   AND name NOT LIKE 'libsql\\_%' ESCAPE '\\'
                 ORDER BY name",
                (),
            )
            .await?;

        let mut tables = Vec::new();
        while let Some(row) = rows.next().await? {
            tables.push(get_string(&row, 0)?);
        }
        Ok(tables)
    }

    /// Resolve `name` against the table list, ignoring ASCII case as the
    /// engine does, and return the catalog's spelling.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such table exists.
    pub async fn ensure_table(&self, name: &str) -> Result<String, DatabaseError> {
        let tables = self.list_tables().await?;
        tables
            .into_iter()
            .find(|table| table.eq_ignore_ascii_case(name))
            .ok_or_else(|| DatabaseError::not_found("table", name))
    }

    /// Columns of `table` in declaration order.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown table, or `DatabaseError` if the pragma fails.
    pub async fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
        let table = self.ensure_table(table).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT name, type, \"notnull\", dflt_value, pk
                 FROM pragma_table_info(?1) ORDER BY cid",
                [table.as_str()],
            )
            .await?;

        let mut columns = Vec::new();
        while let Some(row) = rows.next().await? {
            columns.push(ColumnInfo {
                name: get_string(&row, 0)?,
                data_type: get_opt_string(&row, 1)?.unwrap_or_default(),
                nullable: get_i64(&row, 2)? == 0,
                default: get_opt_string(&row, 3)?,
                primary_key: get_i64(&row, 4)? > 0,
            });
        }
        Ok(columns)
    }

    /// Row count of a table already resolved by [`Self::ensure_table`].
    pub(crate) async fn count_rows(&self, table: &str) -> Result<u64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        debug!(%sql, "counting rows");
        let mut rows = self
            .db()
            .conn()
            .query(&sql, ())
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(u64::try_from(get_i64(&row, 0)?).unwrap_or(0))
    }

    /// Column and row counts for every table.
    ///
    /// A table whose columns or rows cannot be counted is logged and
    /// reported with 0 for that figure.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` only if the table list itself cannot be read.
    pub async fn database_overview(&self) -> Result<Vec<TableSummary>, DatabaseError> {
        let mut summaries = Vec::new();
        for name in self.list_tables().await? {
            let column_count = match self.describe_table(&name).await {
                Ok(columns) => columns.len() as u64,
                Err(e) => {
                    warn!(table = %name, error = %e, "could not describe table");
                    0
                }
            };
            let row_count = match self.count_rows(&name).await {
                Ok(count) => count,
                Err(e) => {
                    warn!(table = %name, error = %e, "could not count rows");
                    0
                }
            };
            summaries.push(TableSummary {
                name,
                column_count,
                row_count,
            });
        }
        Ok(summaries)
    }
}
