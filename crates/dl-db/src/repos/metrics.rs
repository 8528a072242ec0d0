//! Business metric aggregation.
//!
//! `compute_business_metrics` never fails: each figure is its own query and
//! a failing query is logged and reported as 0. The other summaries here
//! propagate their errors.

use tracing::{debug, warn};

use dl_config::KpiConfig;
use dl_core::entities::{Deal, InventoryItem};
use dl_core::kpi::Transaction;
use dl_core::pipeline::{PipelineSummary, pipeline_summary};
use dl_core::responses::{BusinessMetrics, DepartmentHeadcount, FinanceSummary};

use crate::error::DatabaseError;
use crate::helpers::{get_i64, get_opt_string, get_string, parse_date, quote_ident, value_as_f64};
use crate::repos::records::{DEAL_COLS, INVENTORY_COLS, row_to_deal, row_to_inventory_item};
use crate::service::DataLinkService;

const ACTIVE_CUSTOMERS_SQL: &str = "SELECT COUNT(*) FROM customers WHERE status = 'Active'";
const TOTAL_REVENUE_SQL: &str = "SELECT SUM(amount) FROM invoices WHERE status = 'Paid'";
const LOW_STOCK_SQL: &str = "SELECT COUNT(*) FROM inventory WHERE current_stock <= reorder_point";
const ACTIVE_EMPLOYEES_SQL: &str = "SELECT COUNT(*) FROM employees WHERE status = 'Active'";
const ACTIVE_PROJECTS_SQL: &str =
    "SELECT COUNT(*) FROM projects WHERE status IN ('Planning', 'In Progress')";

/// Where transaction-like rows are read from for KPI and trend computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSource {
    pub table: String,
    pub date_column: String,
    pub revenue_column: String,
    pub customer_column: Option<String>,
}

impl Default for TransactionSource {
    fn default() -> Self {
        Self::from(&KpiConfig::default())
    }
}

impl From<&KpiConfig> for TransactionSource {
    fn from(config: &KpiConfig) -> Self {
        Self {
            table: config.table.clone(),
            date_column: config.date_column.clone(),
            revenue_column: config.revenue_column.clone(),
            customer_column: config.customer_column().map(str::to_string),
        }
    }
}

impl DataLinkService {
    /// First column of the first row as a number. NULL and no rows read as 0.
    async fn scalar_f64(&self, sql: &str) -> Result<f64, DatabaseError> {
        debug!(%sql, "metric query");
        let mut rows = self
            .db()
            .conn()
            .query(sql, ())
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        match rows.next().await? {
            Some(row) => Ok(value_as_f64(&row.get_value(0)?).unwrap_or(0.0)),
            None => Ok(0.0),
        }
    }

    async fn metric_or_zero(&self, name: &str, sql: &str) -> f64 {
        match self.scalar_f64(sql).await {
            Ok(value) => value,
            Err(e) => {
                warn!(metric = name, error = %e, "metric query failed, reporting 0");
                0.0
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn count_or_zero(&self, name: &str, sql: &str) -> u64 {
        self.metric_or_zero(name, sql).await.max(0.0) as u64
    }

    /// Dashboard headline numbers.
    pub async fn compute_business_metrics(&self) -> BusinessMetrics {
        BusinessMetrics {
            active_customers: self.count_or_zero("active_customers", ACTIVE_CUSTOMERS_SQL).await,
            total_revenue: self.metric_or_zero("total_revenue", TOTAL_REVENUE_SQL).await,
            low_stock_items: self.count_or_zero("low_stock_items", LOW_STOCK_SQL).await,
            total_employees: self.count_or_zero("total_employees", ACTIVE_EMPLOYEES_SQL).await,
            active_projects: self.count_or_zero("active_projects", ACTIVE_PROJECTS_SQL).await,
        }
    }

    /// Read `(date, revenue, customer)` rows from `source`.
    ///
    /// Rows whose date does not parse or whose revenue is not numeric are
    /// skipped.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown table or column, `Query` if the read fails.
    pub async fn load_transactions(
        &self,
        source: &TransactionSource,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let columns = self.describe_table(&source.table).await?;
        let mut wanted = vec![&source.date_column, &source.revenue_column];
        if let Some(customer) = &source.customer_column {
            wanted.push(customer);
        }
        for column in &wanted {
            if !columns.iter().any(|c| &c.name == *column) {
                return Err(DatabaseError::not_found(
                    "column",
                    format!("{}.{column}", source.table),
                ));
            }
        }

        let select = wanted
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {select} FROM {}", quote_ident(&source.table));
        debug!(%sql, "loading transactions");
        let mut rows = self
            .db()
            .conn()
            .query(&sql, ())
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let mut transactions = Vec::new();
        let mut skipped = 0_usize;
        while let Some(row) = rows.next().await? {
            let date = match row.get_value(0)? {
                libsql::Value::Text(s) => parse_date(&s),
                _ => None,
            };
            let revenue = value_as_f64(&row.get_value(1)?);
            let (Some(date), Some(revenue)) = (date, revenue) else {
                skipped += 1;
                continue;
            };
            let customer = if wanted.len() > 2 {
                get_opt_string(&row, 2)?
            } else {
                None
            };
            transactions.push(Transaction {
                date,
                revenue,
                customer,
            });
        }
        if skipped > 0 {
            debug!(skipped, table = %source.table, "skipped rows without a usable date or revenue");
        }
        Ok(transactions)
    }

    /// Every deal, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or row mapping fails.
    pub async fn list_deals(&self) -> Result<Vec<Deal>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {DEAL_COLS} FROM deals ORDER BY id"), ())
            .await?;
        let mut deals = Vec::new();
        while let Some(row) = rows.next().await? {
            deals.push(row_to_deal(&row)?);
        }
        Ok(deals)
    }

    /// Stage totals, win rate, and open pipeline value over all deals.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the deals cannot be read.
    pub async fn pipeline(&self) -> Result<PipelineSummary, DatabaseError> {
        Ok(pipeline_summary(&self.list_deals().await?))
    }

    /// Invoice totals by status, expenses, and net income.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if either aggregate query fails.
    pub async fn finance_summary(&self) -> Result<FinanceSummary, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(SUM(amount), 0),
                        COALESCE(SUM(CASE WHEN status = 'Paid' THEN amount END), 0),
                        COALESCE(SUM(CASE WHEN status = 'Pending' THEN amount END), 0),
                        COALESCE(SUM(CASE WHEN status = 'Overdue' THEN amount END), 0)
                 FROM invoices",
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let invoiced = |idx| -> Result<f64, DatabaseError> {
            Ok(value_as_f64(&row.get_value(idx)?).unwrap_or(0.0))
        };
        let (total_invoiced, paid, pending, overdue) =
            (invoiced(0)?, invoiced(1)?, invoiced(2)?, invoiced(3)?);

        let total_expenses = self
            .scalar_f64("SELECT COALESCE(SUM(amount), 0) FROM expenses")
            .await?;

        Ok(FinanceSummary {
            total_invoiced,
            paid,
            pending,
            overdue,
            total_expenses,
            net_income: paid - total_expenses,
        })
    }

    /// Inventory items at or below their reorder point, by SKU.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or row mapping fails.
    pub async fn low_stock_items(&self) -> Result<Vec<InventoryItem>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {INVENTORY_COLS} FROM inventory
                     WHERE current_stock <= reorder_point ORDER BY sku"
                ),
                (),
            )
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_inventory_item(&row)?);
        }
        Ok(items)
    }

    /// Active employees per department, largest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn department_headcount(&self) -> Result<Vec<DepartmentHeadcount>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(NULLIF(department, ''), 'Unassigned') AS dept, COUNT(*) AS n
                 FROM employees WHERE status = 'Active'
                 GROUP BY dept ORDER BY n DESC, dept",
                (),
            )
            .await?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next().await? {
            departments.push(DepartmentHeadcount {
                department: get_string(&row, 0)?,
                employees: u64::try_from(get_i64(&row, 1)?).unwrap_or(0),
            });
        }
        Ok(departments)
    }
}
