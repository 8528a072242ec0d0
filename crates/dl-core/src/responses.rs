//! Result-set and report types returned by `dl-db` and rendered by `datalink`.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rows returned by an arbitrary query, with column names in select order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as field-name → value records.
    #[must_use]
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<Map<String, Value>>()
            })
            .collect()
    }
}

/// Outcome of an ad-hoc statement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// A row-returning statement.
    Rows(ResultSet),
    /// A statement that was executed and committed.
    Affected { rows_affected: u64 },
}

/// One declared column of a table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub primary_key: bool,
}

/// Table-level overview entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub column_count: u64,
    pub row_count: u64,
}

/// One page of a browsed table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TablePage {
    pub table: String,
    pub page: u64,
    pub page_size: u64,
    /// Row count observed just before the page was fetched.
    pub total_rows: u64,
    pub total_pages: u64,
    pub result: ResultSet,
}

/// Number of pages needed for `total_rows` at `page_size` per page.
#[must_use]
pub const fn total_pages(total_rows: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_rows.div_ceil(page_size)
    }
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BusinessMetrics {
    pub active_customers: u64,
    pub total_revenue: f64,
    pub low_stock_items: u64,
    pub total_employees: u64,
    pub active_projects: u64,
}

/// Invoice and expense roll-up for the finance category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FinanceSummary {
    pub total_invoiced: f64,
    pub paid: f64,
    pub pending: f64,
    pub overdue: f64,
    pub total_expenses: f64,
    /// Paid invoices minus expenses.
    pub net_income: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DepartmentHeadcount {
    pub department: String,
    pub employees: u64,
}

/// Table name → row records. This is the on-disk backup format; tables keep
/// the order they were selected or written in.
pub type BackupDocument = IndexMap<String, Vec<Map<String, Value>>>;

/// A table that could not be backed up or restored, with the driver's message.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TableFailure {
    pub table: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BackupReport {
    pub document: BackupDocument,
    pub failed: Vec<TableFailure>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: Vec<String>,
    pub failed: Vec<TableFailure>,
}

impl RestoreReport {
    /// True when at least one table was restored.
    #[must_use]
    pub fn any_restored(&self) -> bool {
        !self.restored.is_empty()
    }
}
