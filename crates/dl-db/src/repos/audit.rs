//! Audit log repository.
//!
//! Append-only entries written alongside every typed insert and update.
//! The SQL console and restore bypass it.

use chrono::Utc;
use serde_json::Value;

use dl_core::entities::AuditLogEntry;
use dl_core::enums::AuditAction;

use crate::error::DatabaseError;
use crate::helpers::{get_i64, get_opt_string, get_string, parse_datetime, parse_optional_json};
use crate::service::DataLinkService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub table: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

/// Before/after picture of one mutation.
pub(crate) struct AuditRecord<'a> {
    pub table: &'a str,
    pub record_id: i64,
    pub action: AuditAction,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
}

impl DataLinkService {
    /// Append an audit entry. Called by every typed mutation, inside its
    /// transaction.
    pub(crate) async fn append_audit(&self, record: AuditRecord<'_>) -> Result<(), DatabaseError> {
        let old_values = record.old_values.map(|v| v.to_string());
        let new_values = record.new_values.map(|v| v.to_string());
        self.db()
            .conn()
            .execute(
                "INSERT INTO audit_log (table_name, record_id, action, old_values, new_values, changed_by, changed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    record.table,
                    record.record_id,
                    record.action.as_str(),
                    old_values,
                    new_values,
                    self.changed_by(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(
        &self,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditLogEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref table) = filter.table {
            params.push(libsql::Value::Text(table.clone()));
            conditions.push(format!("table_name = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, table_name, record_id, action, old_values, new_values, changed_by, changed_at
             FROM audit_log {where_clause}
             ORDER BY changed_at DESC, id DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next().await? {
            entries.push(AuditLogEntry {
                id: get_i64(&row, 0)?,
                table_name: get_string(&row, 1)?,
                record_id: get_i64(&row, 2)?,
                action: get_string(&row, 3)?.parse()?,
                old_values: parse_optional_json(get_opt_string(&row, 4)?.as_deref())?,
                new_values: parse_optional_json(get_opt_string(&row, 5)?.as_deref())?,
                changed_by: get_opt_string(&row, 6)?,
                changed_at: parse_datetime(&get_string(&row, 7)?)?,
            });
        }

        Ok(entries)
    }
}
