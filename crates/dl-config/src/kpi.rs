//! Source columns for KPI and trend computation.

use serde::{Deserialize, Serialize};

fn default_table() -> String {
    "invoices".to_string()
}

fn default_date_column() -> String {
    "invoice_date".to_string()
}

fn default_revenue_column() -> String {
    "amount".to_string()
}

fn default_customer_column() -> String {
    "customer_name".to_string()
}

/// Which table and columns are projected to `(date, revenue, customer)`.
///
/// An empty `customer_column` means the source has no customer dimension;
/// customer counts and customer growth are then 0.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KpiConfig {
    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_date_column")]
    pub date_column: String,

    #[serde(default = "default_revenue_column")]
    pub revenue_column: String,

    #[serde(default = "default_customer_column")]
    pub customer_column: String,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            date_column: default_date_column(),
            revenue_column: default_revenue_column(),
            customer_column: default_customer_column(),
        }
    }
}

impl KpiConfig {
    pub fn customer_column(&self) -> Option<&str> {
        if self.customer_column.is_empty() {
            None
        } else {
            Some(&self.customer_column)
        }
    }
}
