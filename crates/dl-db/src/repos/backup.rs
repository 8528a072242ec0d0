//! JSON backup and restore.
//!
//! A backup document maps table names to arrays of row objects. Restore
//! replaces each table's contents in its own transaction; tables are
//! independent, so one failing table leaves the others restored.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use dl_core::responses::{BackupDocument, BackupReport, RestoreReport, TableFailure};

use crate::error::DatabaseError;
use crate::helpers::{collect_result_set, json_to_value, quote_ident};
use crate::service::DataLinkService;

/// Default file name for a backup taken at `at`.
#[must_use]
pub fn backup_file_name(at: NaiveDateTime) -> String {
    format!("datalink_backup_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Pretty-printed JSON text of a backup document.
///
/// # Errors
///
/// Returns `DatabaseError::Json` if serialization fails.
pub fn to_backup_json(document: &BackupDocument) -> Result<String, DatabaseError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a backup document. The top level must be an object of arrays of
/// row objects.
///
/// # Errors
///
/// Returns `DatabaseError::Json` for anything else.
pub fn parse_backup_json(text: &str) -> Result<BackupDocument, DatabaseError> {
    Ok(serde_json::from_str(text)?)
}

fn insert_sql(table: &str, record: &Map<String, Value>) -> String {
    if record.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table));
    }
    let columns = record
        .keys()
        .map(|k| quote_ident(k))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=record.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        quote_ident(table)
    )
}

impl DataLinkService {
    async fn table_records(&self, table: &str) -> Result<Vec<Map<String, Value>>, DatabaseError> {
        let name = self.ensure_table(table).await?;
        let sql = format!("SELECT * FROM {}", quote_ident(&name));
        let rows = self
            .db()
            .conn()
            .query(&sql, ())
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(collect_result_set(rows).await?.to_records())
    }

    /// Export every row of each selected table.
    ///
    /// A table that cannot be read is left out of the document and listed
    /// in `failed`.
    pub async fn backup<S: AsRef<str>>(&self, tables: &[S]) -> BackupReport {
        let mut report = BackupReport::default();
        for table in tables {
            let table = table.as_ref();
            match self.table_records(table).await {
                Ok(records) => {
                    debug!(table, rows = records.len(), "table backed up");
                    report.document.insert(table.to_string(), records);
                }
                Err(e) => {
                    warn!(table, error = %e, "backup of table failed");
                    report.failed.push(TableFailure {
                        table: table.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
        info!(
            tables = report.document.len(),
            failed = report.failed.len(),
            "backup complete"
        );
        report
    }

    async fn restore_table(
        &self,
        table: &str,
        records: &[Map<String, Value>],
    ) -> Result<(), DatabaseError> {
        let name = self.ensure_table(table).await?;
        self.in_transaction(move || async move {
            let conn = self.db().conn();
            conn.execute(&format!("DELETE FROM {}", quote_ident(&name)), ())
                .await
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
            for record in records {
                let params = record.values().map(json_to_value).collect::<Vec<_>>();
                conn.execute(&insert_sql(&name, record), libsql::params_from_iter(params))
                    .await
                    .map_err(|e| DatabaseError::Query(e.to_string()))?;
            }
            Ok(())
        })
        .await
    }

    /// Replace the contents of every table named in `document` with its
    /// records, in document order.
    ///
    /// Unknown tables and tables whose inserts fail are listed in `failed`
    /// and keep their previous contents.
    pub async fn restore(&self, document: &BackupDocument) -> RestoreReport {
        let mut report = RestoreReport::default();
        for (table, records) in document {
            match self.restore_table(table, records).await {
                Ok(()) => {
                    debug!(table = %table, rows = records.len(), "table restored");
                    report.restored.push(table.clone());
                }
                Err(e) => {
                    warn!(table = %table, error = %e, "restore of table failed");
                    report.failed.push(TableFailure {
                        table: table.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        info!(
            restored = report.restored.len(),
            failed = report.failed.len(),
            "restore complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{empty_service, seeded_service};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn file_name_uses_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        assert_eq!(backup_file_name(at), "datalink_backup_20240309_070501.json");
    }

    #[test]
    fn insert_sql_quotes_columns() {
        let sql = insert_sql("customers", &record(json!({"customer_id": "C", "name": "N"})));
        assert_eq!(
            sql,
            r#"INSERT INTO "customers" ("customer_id", "name") VALUES (?1, ?2)"#
        );
        assert_eq!(
            insert_sql("leads", &Map::new()),
            r#"INSERT INTO "leads" DEFAULT VALUES"#
        );
    }

    #[tokio::test]
    async fn backup_collects_default_tables() {
        let service = seeded_service().await;
        let report = service
            .backup(&["customers", "chart_of_accounts", "invoices"])
            .await;

        assert!(report.failed.is_empty());
        assert_eq!(report.document["customers"].len(), 3);
        assert_eq!(report.document["chart_of_accounts"].len(), 8);
        assert!(report.document["invoices"].is_empty());
        assert_eq!(report.document["customers"][0]["customer_id"], "CUST-0001");
    }

    #[tokio::test]
    async fn backup_reports_unknown_table() {
        let service = seeded_service().await;
        let report = service.backup(&["customers", "nope"]).await;
        assert_eq!(report.document.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].table, "nope");
    }

    #[tokio::test]
    async fn restore_replaces_table_contents() {
        let service = seeded_service().await;
        let mut document = BackupDocument::new();
        document.insert(
            "customers".into(),
            vec![record(json!({
                "customer_id": "CUST-0100",
                "name": "Only One",
                "status": "Active",
                "total_value": 10.5
            }))],
        );

        let report = service.restore(&document).await;
        assert_eq!(report.restored, vec!["customers"]);
        assert_eq!(service.count_rows("customers").await.unwrap(), 1);
        let customer = service.get_customer_by_code("CUST-0100").await.unwrap();
        assert_eq!(customer.total_value, 10.5);
    }

    #[tokio::test]
    async fn failing_table_keeps_previous_rows() {
        let service = seeded_service().await;
        let mut document = BackupDocument::new();
        document.insert(
            "inventory".into(),
            vec![record(json!({"sku": "X-1", "product_name": "ok"})), record(json!({"sku": "X-1", "product_name": "dup"}))],
        );
        document.insert(
            "leads".into(),
            vec![record(json!({"lead_id": "LEAD-0001", "name": "Ada"}))],
        );
        document.insert("ghost".into(), vec![]);

        let report = service.restore(&document).await;
        assert_eq!(report.restored, vec!["leads"]);
        let failed: Vec<_> = report.failed.iter().map(|f| f.table.as_str()).collect();
        assert_eq!(failed, vec!["inventory", "ghost"]);
        assert!(report.failed[0].error.contains("UNIQUE"));
        assert_eq!(service.count_rows("inventory").await.unwrap(), 3);
        assert_eq!(service.count_rows("leads").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn backup_keeps_selection_order() {
        let service = seeded_service().await;
        let report = service.backup(&["invoices", "customers", "chart_of_accounts"]).await;
        let tables: Vec<_> = report.document.keys().map(String::as_str).collect();
        assert_eq!(tables, vec!["invoices", "customers", "chart_of_accounts"]);

        let text = to_backup_json(&report.document).unwrap();
        let parsed = parse_backup_json(&text).unwrap();
        let tables: Vec<_> = parsed.keys().map(String::as_str).collect();
        assert_eq!(tables, vec!["invoices", "customers", "chart_of_accounts"]);
    }

    #[tokio::test]
    async fn restore_follows_document_order() {
        let service = seeded_service().await;
        service
            .db()
            .conn()
            .execute(
                "INSERT INTO deals (deal_name, customer_id, value, stage) \
                 SELECT 'Renewal', id, 500.0, 'Prospecting' FROM customers WHERE customer_id = 'CUST-0001'",
                (),
            )
            .await
            .unwrap();

        let document = parse_backup_json(
            r#"{"deals": [], "customers": [{"id": 2, "customer_id": "CUST-0200", "name": "B"}]}"#,
        )
        .unwrap();
        let report = service.restore(&document).await;

        assert!(report.failed.is_empty(), "{:?}", report.failed);
        assert_eq!(report.restored, vec!["deals", "customers"]);
        assert_eq!(service.count_rows("deals").await.unwrap(), 0);
        assert_eq!(service.count_rows("customers").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn backup_then_restore_round_trips() {
        let source = seeded_service().await;
        let backup = source.backup(&["customers", "inventory"]).await;
        let text = to_backup_json(&backup.document).unwrap();

        let target = empty_service().await;
        let report = target.restore(&parse_backup_json(&text).unwrap()).await;
        assert!(report.failed.is_empty());

        let again = target.backup(&["customers", "inventory"]).await;
        assert_eq!(again.document, backup.document);
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(parse_backup_json(r#"{"customers": {"not": "a list"}}"#).is_err());
        assert!(parse_backup_json("[1, 2]").is_err());
    }
}
