//! Paginated browsing of an arbitrary table.

use tracing::debug;

use dl_core::responses::{TablePage, total_pages};

use crate::error::DatabaseError;
use crate::helpers::{collect_result_set, quote_ident};
use crate::service::DataLinkService;

impl DataLinkService {
    /// Fetch page `page` (1-based) of `table`, `page_size` rows per page.
    ///
    /// The row count is read before the page with no transaction around the
    /// two queries, so `total_pages` can be stale under concurrent writes. A
    /// page past the end comes back empty.
    ///
    /// # Errors
    ///
    /// `Validation` for a zero page or page size, `NotFound` for an unknown
    /// table, `Query` if either statement fails.
    pub async fn fetch_page(
        &self,
        table: &str,
        page_size: u64,
        page: u64,
    ) -> Result<TablePage, DatabaseError> {
        if page_size == 0 {
            return Err(DatabaseError::Validation("page size must be at least 1".into()));
        }
        if page == 0 {
            return Err(DatabaseError::Validation("page number must be at least 1".into()));
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .and_then(|offset| i64::try_from(offset).ok())
            .ok_or_else(|| DatabaseError::Validation(format!("page {page} is out of range")))?;
        let limit = i64::try_from(page_size)
            .map_err(|_| DatabaseError::Validation(format!("page size {page_size} is too large")))?;

        let table = self.ensure_table(table).await?;
        let total_rows = self.count_rows(&table).await?;

        let sql = format!("SELECT * FROM {} LIMIT ?1 OFFSET ?2", quote_ident(&table));
        debug!(%sql, limit, offset, "fetching page");
        let rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![limit, offset])
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        let result = collect_result_set(rows).await?;

        Ok(TablePage {
            table,
            page,
            page_size,
            total_rows,
            total_pages: total_pages(total_rows, page_size),
            result,
        })
    }
}
