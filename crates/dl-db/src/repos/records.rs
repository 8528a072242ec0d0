//! Typed record repository: the add-record forms and status updates.
//!
//! Each mutation runs in one transaction together with its audit entry.
//! Codes that are not supplied are generated from the table's row count,
//! so they can collide after rows are deleted; the unique index then
//! rejects the insert.

use std::future::Future;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use dl_core::codes::{
    PREFIX_CUSTOMER, PREFIX_EMPLOYEE, PREFIX_EXPENSE, PREFIX_INVOICE, PREFIX_LEAD, format_code,
};
use dl_core::entities::{
    Account, Customer, Deal, Employee, Expense, InventoryItem, Invoice, Lead, NewAccount,
    NewCustomer, NewDeal, NewEmployee, NewExpense, NewInventoryItem, NewInvoice, NewLead,
};
use dl_core::enums::{AuditAction, CustomerStatus, DealStage, InvoiceStatus};

use crate::error::DatabaseError;
use crate::helpers::{
    get_date, get_f64, get_i64, get_opt_date, get_opt_f64, get_opt_i64, get_opt_string,
    get_string, parse_datetime,
};
use crate::repos::audit::AuditRecord;
use crate::service::DataLinkService;

pub(crate) const CUSTOMER_COLS: &str = "id, customer_id, name, email, phone, company, industry, status, source, total_value, notes, created_at, last_contact";
pub(crate) const INVENTORY_COLS: &str = "id, sku, product_name, category, current_stock, reorder_point, unit_cost, unit_price, supplier, location, is_active";
pub(crate) const EMPLOYEE_COLS: &str = "id, employee_id, first_name, last_name, email, phone, department, position, hire_date, salary, status, manager_id, created_at";
pub(crate) const DEAL_COLS: &str = "id, deal_name, customer_id, value, stage, probability, close_date, sales_rep, notes, created_at, updated_at";
pub(crate) const INVOICE_COLS: &str = "id, invoice_number, customer_name, customer_email, amount, invoice_date, due_date, status, description, created_by, created_at";
pub(crate) const EXPENSE_COLS: &str = "id, expense_id, category, amount, expense_date, vendor, description, status, created_by, created_at";
pub(crate) const ACCOUNT_COLS: &str = "id, account_code, account_name, account_type, balance, is_active, created_at";
pub(crate) const LEAD_COLS: &str = "id, lead_id, name, email, phone, company, source, score, interest_level, status, notes, created_at, last_contact";

/// Status written on expenses entered through DataLink.
pub const EXPENSE_STATUS_RECORDED: &str = "Recorded";

/// Status written on leads entered through DataLink.
pub const LEAD_STATUS_NEW: &str = "New";

/// Inclusive bounds of a lead score.
pub const LEAD_SCORE_RANGE: std::ops::RangeInclusive<i64> = 0..=100;

pub(crate) fn row_to_customer(row: &libsql::Row) -> Result<Customer, DatabaseError> {
    Ok(Customer {
        id: get_i64(row, 0)?,
        code: get_string(row, 1)?,
        name: get_string(row, 2)?,
        email: get_opt_string(row, 3)?,
        phone: get_opt_string(row, 4)?,
        company: get_opt_string(row, 5)?,
        industry: get_opt_string(row, 6)?,
        status: get_string(row, 7)?.parse()?,
        source: get_opt_string(row, 8)?,
        total_value: get_f64(row, 9)?,
        notes: get_opt_string(row, 10)?,
        created_at: parse_datetime(&get_string(row, 11)?)?,
        last_contact: get_opt_date(row, 12)?,
    })
}

pub(crate) fn row_to_inventory_item(row: &libsql::Row) -> Result<InventoryItem, DatabaseError> {
    Ok(InventoryItem {
        id: get_i64(row, 0)?,
        sku: get_string(row, 1)?,
        product_name: get_string(row, 2)?,
        category: get_opt_string(row, 3)?,
        current_stock: get_i64(row, 4)?,
        reorder_point: get_i64(row, 5)?,
        unit_cost: get_f64(row, 6)?,
        unit_price: get_f64(row, 7)?,
        supplier: get_opt_string(row, 8)?,
        location: get_opt_string(row, 9)?,
        is_active: get_opt_i64(row, 10)?.unwrap_or(1) != 0,
    })
}

pub(crate) fn row_to_employee(row: &libsql::Row) -> Result<Employee, DatabaseError> {
    Ok(Employee {
        id: get_i64(row, 0)?,
        code: get_string(row, 1)?,
        first_name: get_string(row, 2)?,
        last_name: get_string(row, 3)?,
        email: get_opt_string(row, 4)?,
        phone: get_opt_string(row, 5)?,
        department: get_opt_string(row, 6)?,
        position: get_opt_string(row, 7)?,
        hire_date: get_opt_date(row, 8)?,
        salary: get_opt_f64(row, 9)?,
        status: get_opt_string(row, 10)?.unwrap_or_default(),
        manager_id: get_opt_i64(row, 11)?,
        created_at: parse_datetime(&get_string(row, 12)?)?,
    })
}

pub(crate) fn row_to_deal(row: &libsql::Row) -> Result<Deal, DatabaseError> {
    Ok(Deal {
        id: get_i64(row, 0)?,
        deal_name: get_string(row, 1)?,
        customer_id: get_opt_i64(row, 2)?,
        value: get_f64(row, 3)?,
        stage: get_string(row, 4)?.parse()?,
        probability: get_i64(row, 5)?,
        close_date: get_opt_date(row, 6)?,
        sales_rep: get_opt_string(row, 7)?,
        notes: get_opt_string(row, 8)?,
        created_at: parse_datetime(&get_string(row, 9)?)?,
        updated_at: parse_datetime(&get_string(row, 10)?)?,
    })
}

pub(crate) fn row_to_invoice(row: &libsql::Row) -> Result<Invoice, DatabaseError> {
    Ok(Invoice {
        id: get_i64(row, 0)?,
        invoice_number: get_string(row, 1)?,
        customer_name: get_string(row, 2)?,
        customer_email: get_opt_string(row, 3)?,
        amount: get_f64(row, 4)?,
        invoice_date: get_date(row, 5)?,
        due_date: get_date(row, 6)?,
        status: get_string(row, 7)?.parse()?,
        description: get_opt_string(row, 8)?,
        created_by: get_opt_string(row, 9)?,
        created_at: parse_datetime(&get_string(row, 10)?)?,
    })
}

pub(crate) fn row_to_expense(row: &libsql::Row) -> Result<Expense, DatabaseError> {
    Ok(Expense {
        id: get_i64(row, 0)?,
        code: get_string(row, 1)?,
        category: get_string(row, 2)?,
        amount: get_f64(row, 3)?,
        expense_date: get_date(row, 4)?,
        vendor: get_opt_string(row, 5)?,
        description: get_opt_string(row, 6)?,
        status: get_opt_string(row, 7)?.unwrap_or_default(),
        created_by: get_opt_string(row, 8)?,
        created_at: parse_datetime(&get_string(row, 9)?)?,
    })
}

pub(crate) fn row_to_account(row: &libsql::Row) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: get_i64(row, 0)?,
        account_code: get_string(row, 1)?,
        account_name: get_string(row, 2)?,
        account_type: get_string(row, 3)?.parse()?,
        balance: get_opt_f64(row, 4)?.unwrap_or(0.0),
        is_active: get_opt_i64(row, 5)?.unwrap_or(1) != 0,
        created_at: parse_datetime(&get_string(row, 6)?)?,
    })
}

pub(crate) fn row_to_lead(row: &libsql::Row) -> Result<Lead, DatabaseError> {
    Ok(Lead {
        id: get_i64(row, 0)?,
        code: get_string(row, 1)?,
        name: get_string(row, 2)?,
        email: get_opt_string(row, 3)?,
        phone: get_opt_string(row, 4)?,
        company: get_opt_string(row, 5)?,
        source: get_opt_string(row, 6)?,
        score: get_opt_i64(row, 7)?.unwrap_or(0),
        interest_level: get_opt_string(row, 8)?,
        status: get_opt_string(row, 9)?.unwrap_or_default(),
        notes: get_opt_string(row, 10)?,
        created_at: parse_datetime(&get_string(row, 11)?)?,
        last_contact: get_opt_date(row, 12)?,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    Ok(serde_json::to_value(value)?)
}

impl DataLinkService {
    /// Run `work` between BEGIN and COMMIT on the shared connection,
    /// rolling back if it fails.
    pub(crate) async fn in_transaction<T, F, Fut>(&self, work: F) -> Result<T, DatabaseError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DatabaseError>>,
    {
        let tx = self.db().conn().transaction().await?;
        match work().await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Next `<PREFIX>-<n:04>` code for `table`, from its row count.
    async fn next_code(&self, table: &str, prefix: &str) -> Result<String, DatabaseError> {
        let count = self.count_rows(table).await?;
        Ok(format_code(prefix, count + 1))
    }

    async fn fetch_one<T>(
        &self,
        sql: &str,
        key: libsql::Value,
        map: fn(&libsql::Row) -> Result<T, DatabaseError>,
        kind: &str,
    ) -> Result<T, DatabaseError> {
        let name = match &key {
            libsql::Value::Text(s) => s.clone(),
            libsql::Value::Integer(n) => n.to_string(),
            other => format!("{other:?}"),
        };
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter([key]))
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(kind, name))?;
        map(&row)
    }

    async fn execute_mutation(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<i64, DatabaseError> {
        self.db()
            .conn()
            .execute(sql, params)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(self.db().conn().last_insert_rowid())
    }

    // -- customers ----------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no customer has row id `id`.
    pub async fn get_customer(&self, id: i64) -> Result<Customer, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {CUSTOMER_COLS} FROM customers WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_customer,
            "customer",
        )
        .await
    }

    /// # Errors
    ///
    /// `NotFound` when no customer has business code `code`.
    pub async fn get_customer_by_code(&self, code: &str) -> Result<Customer, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {CUSTOMER_COLS} FROM customers WHERE customer_id = ?1"),
            libsql::Value::Text(code.to_string()),
            row_to_customer,
            "customer",
        )
        .await
    }

    /// Insert a customer, generating `CUST-nnnn` when no code is given.
    ///
    /// # Errors
    ///
    /// `Query` when the insert is rejected (e.g. duplicate code).
    pub async fn add_customer(&self, new: &NewCustomer) -> Result<Customer, DatabaseError> {
        self.in_transaction(move || async move {
            let code = match &new.code {
                Some(code) => code.clone(),
                None => self.next_code("customers", PREFIX_CUSTOMER).await?,
            };
            let id = self
                .execute_mutation(
                    "INSERT INTO customers (customer_id, name, email, phone, company, industry, status, source, notes)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    libsql::params![
                        code.as_str(),
                        new.name.as_str(),
                        new.email.as_deref(),
                        new.phone.as_deref(),
                        new.company.as_deref(),
                        new.industry.as_deref(),
                        new.status.as_str(),
                        new.source.as_deref(),
                        new.notes.as_deref()
                    ],
                )
                .await?;
            let customer = self.get_customer(id).await?;
            self.append_audit(AuditRecord {
                table: "customers",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&customer)?),
            })
            .await?;
            debug!(code = %customer.code, "customer added");
            Ok(customer)
        })
        .await
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown customer code.
    pub async fn update_customer_status(
        &self,
        code: &str,
        status: CustomerStatus,
    ) -> Result<Customer, DatabaseError> {
        let before = self.get_customer_by_code(code).await?;
        self.in_transaction(move || async move {
            self.execute_mutation(
                "UPDATE customers SET status = ?1 WHERE id = ?2",
                libsql::params![status.as_str(), before.id],
            )
            .await?;
            let after = self.get_customer(before.id).await?;
            self.append_audit(AuditRecord {
                table: "customers",
                record_id: before.id,
                action: AuditAction::Update,
                old_values: Some(to_json(&before)?),
                new_values: Some(to_json(&after)?),
            })
            .await?;
            Ok(after)
        })
        .await
    }

    // -- inventory ----------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no item has row id `id`.
    pub async fn get_inventory_item(&self, id: i64) -> Result<InventoryItem, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {INVENTORY_COLS} FROM inventory WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_inventory_item,
            "inventory item",
        )
        .await
    }

    /// # Errors
    ///
    /// `Query` when the insert is rejected (e.g. duplicate SKU).
    pub async fn add_inventory_item(
        &self,
        new: &NewInventoryItem,
    ) -> Result<InventoryItem, DatabaseError> {
        self.in_transaction(move || async move {
            let id = self
                .execute_mutation(
                    "INSERT INTO inventory (sku, product_name, category, current_stock, reorder_point, unit_cost, unit_price, supplier, location)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    libsql::params![
                        new.sku.as_str(),
                        new.product_name.as_str(),
                        new.category.as_deref(),
                        new.current_stock,
                        new.reorder_point,
                        new.unit_cost,
                        new.unit_price,
                        new.supplier.as_deref(),
                        new.location.as_deref()
                    ],
                )
                .await?;
            let item = self.get_inventory_item(id).await?;
            self.append_audit(AuditRecord {
                table: "inventory",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&item)?),
            })
            .await?;
            Ok(item)
        })
        .await
    }

    // -- employees ----------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no employee has row id `id`.
    pub async fn get_employee(&self, id: i64) -> Result<Employee, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_employee,
            "employee",
        )
        .await
    }

    /// Insert an active employee, generating `EMP-nnnn` when no code is given.
    ///
    /// # Errors
    ///
    /// `Query` when the insert is rejected (duplicate code or email,
    /// unknown manager).
    pub async fn add_employee(&self, new: &NewEmployee) -> Result<Employee, DatabaseError> {
        self.in_transaction(move || async move {
            let code = match &new.code {
                Some(code) => code.clone(),
                None => self.next_code("employees", PREFIX_EMPLOYEE).await?,
            };
            let id = self
                .execute_mutation(
                    "INSERT INTO employees (employee_id, first_name, last_name, email, phone, department, position, hire_date, salary, status, manager_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'Active', ?10)",
                    libsql::params![
                        code.as_str(),
                        new.first_name.as_str(),
                        new.last_name.as_str(),
                        new.email.as_deref(),
                        new.phone.as_deref(),
                        new.department.as_deref(),
                        new.position.as_deref(),
                        new.hire_date.map(|d| d.to_string()),
                        new.salary,
                        new.manager_id
                    ],
                )
                .await?;
            let employee = self.get_employee(id).await?;
            self.append_audit(AuditRecord {
                table: "employees",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&employee)?),
            })
            .await?;
            Ok(employee)
        })
        .await
    }

    // -- deals --------------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no deal has row id `id`.
    pub async fn get_deal(&self, id: i64) -> Result<Deal, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {DEAL_COLS} FROM deals WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_deal,
            "deal",
        )
        .await
    }

    /// First deal (by row id) named `deal_name`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no deal has that name.
    pub async fn get_deal_by_name(&self, deal_name: &str) -> Result<Deal, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {DEAL_COLS} FROM deals WHERE deal_name = ?1 ORDER BY id LIMIT 1"),
            libsql::Value::Text(deal_name.to_string()),
            row_to_deal,
            "deal",
        )
        .await
    }

    /// # Errors
    ///
    /// `Query` when the insert is rejected (e.g. unknown customer id).
    pub async fn add_deal(&self, new: &NewDeal) -> Result<Deal, DatabaseError> {
        self.in_transaction(move || async move {
            let now = Utc::now().to_rfc3339();
            let id = self
                .execute_mutation(
                    "INSERT INTO deals (deal_name, customer_id, value, stage, probability, close_date, sales_rep, notes, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                    libsql::params![
                        new.deal_name.as_str(),
                        new.customer_id,
                        new.value,
                        new.stage.as_str(),
                        new.probability,
                        new.close_date.map(|d| d.to_string()),
                        new.sales_rep.as_deref(),
                        new.notes.as_deref(),
                        now.as_str()
                    ],
                )
                .await?;
            let deal = self.get_deal(id).await?;
            self.append_audit(AuditRecord {
                table: "deals",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&deal)?),
            })
            .await?;
            Ok(deal)
        })
        .await
    }

    /// Move a deal to `stage` and log a sales activity for it.
    ///
    /// The lookup by name and the update are separate steps; any stage may
    /// follow any other.
    ///
    /// # Errors
    ///
    /// `NotFound` when no deal has that name.
    pub async fn update_deal_stage(
        &self,
        deal_name: &str,
        stage: DealStage,
    ) -> Result<Deal, DatabaseError> {
        let before = self.get_deal_by_name(deal_name).await?;
        self.in_transaction(move || async move {
            let now = Utc::now();
            self.execute_mutation(
                "UPDATE deals SET stage = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![stage.as_str(), now.to_rfc3339(), before.id],
            )
            .await?;
            self.execute_mutation(
                "INSERT INTO sales_activities (activity_date, activity_type, description, related_to, related_id, sales_rep)
                 VALUES (?1, 'Stage Change', ?2, 'deal', ?3, ?4)",
                libsql::params![
                    now.date_naive().to_string(),
                    format!("Updated {} to {}", before.deal_name, stage),
                    before.id,
                    self.changed_by()
                ],
            )
            .await?;
            let after = self.get_deal(before.id).await?;
            self.append_audit(AuditRecord {
                table: "deals",
                record_id: before.id,
                action: AuditAction::Update,
                old_values: Some(to_json(&before)?),
                new_values: Some(to_json(&after)?),
            })
            .await?;
            Ok(after)
        })
        .await
    }

    // -- invoices -----------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no invoice has row id `id`.
    pub async fn get_invoice(&self, id: i64) -> Result<Invoice, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {INVOICE_COLS} FROM invoices WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_invoice,
            "invoice",
        )
        .await
    }

    /// # Errors
    ///
    /// `NotFound` when no invoice has that number.
    pub async fn get_invoice_by_number(&self, number: &str) -> Result<Invoice, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {INVOICE_COLS} FROM invoices WHERE invoice_number = ?1"),
            libsql::Value::Text(number.to_string()),
            row_to_invoice,
            "invoice",
        )
        .await
    }

    /// Insert a pending invoice, generating `INV-nnnn` when no number is given.
    ///
    /// # Errors
    ///
    /// `Query` when the insert is rejected (e.g. duplicate number).
    pub async fn add_invoice(&self, new: &NewInvoice) -> Result<Invoice, DatabaseError> {
        self.in_transaction(move || async move {
            let number = match &new.invoice_number {
                Some(number) => number.clone(),
                None => self.next_code("invoices", PREFIX_INVOICE).await?,
            };
            let id = self
                .execute_mutation(
                    "INSERT INTO invoices (invoice_number, customer_name, customer_email, amount, invoice_date, due_date, status, description, created_by)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    libsql::params![
                        number.as_str(),
                        new.customer_name.as_str(),
                        new.customer_email.as_deref(),
                        new.amount,
                        new.invoice_date.to_string(),
                        new.due_date.to_string(),
                        InvoiceStatus::Pending.as_str(),
                        new.description.as_deref(),
                        self.changed_by()
                    ],
                )
                .await?;
            let invoice = self.get_invoice(id).await?;
            self.append_audit(AuditRecord {
                table: "invoices",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&invoice)?),
            })
            .await?;
            Ok(invoice)
        })
        .await
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown invoice number.
    pub async fn update_invoice_status(
        &self,
        number: &str,
        status: InvoiceStatus,
    ) -> Result<Invoice, DatabaseError> {
        let before = self.get_invoice_by_number(number).await?;
        self.in_transaction(move || async move {
            self.execute_mutation(
                "UPDATE invoices SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), Utc::now().to_rfc3339(), before.id],
            )
            .await?;
            let after = self.get_invoice(before.id).await?;
            self.append_audit(AuditRecord {
                table: "invoices",
                record_id: before.id,
                action: AuditAction::Update,
                old_values: Some(to_json(&before)?),
                new_values: Some(to_json(&after)?),
            })
            .await?;
            Ok(after)
        })
        .await
    }

    // -- expenses -----------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no expense has row id `id`.
    pub async fn get_expense(&self, id: i64) -> Result<Expense, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {EXPENSE_COLS} FROM expenses WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_expense,
            "expense",
        )
        .await
    }

    /// Record an expense, generating `EXP-nnnn` when no code is given.
    ///
    /// # Errors
    ///
    /// `Query` when the insert is rejected (e.g. duplicate code).
    pub async fn add_expense(&self, new: &NewExpense) -> Result<Expense, DatabaseError> {
        self.in_transaction(move || async move {
            let code = match &new.code {
                Some(code) => code.clone(),
                None => self.next_code("expenses", PREFIX_EXPENSE).await?,
            };
            let id = self
                .execute_mutation(
                    "INSERT INTO expenses (expense_id, category, amount, expense_date, vendor, description, status, created_by)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    libsql::params![
                        code.as_str(),
                        new.category.as_str(),
                        new.amount,
                        new.expense_date.to_string(),
                        new.vendor.as_deref(),
                        new.description.as_deref(),
                        EXPENSE_STATUS_RECORDED,
                        self.changed_by()
                    ],
                )
                .await?;
            let expense = self.get_expense(id).await?;
            self.append_audit(AuditRecord {
                table: "expenses",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&expense)?),
            })
            .await?;
            Ok(expense)
        })
        .await
    }

    // -- chart of accounts --------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no account has row id `id`.
    pub async fn get_account(&self, id: i64) -> Result<Account, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {ACCOUNT_COLS} FROM chart_of_accounts WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_account,
            "account",
        )
        .await
    }

    /// Open an account at a zero balance.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank code or name, `Query` when the insert is
    /// rejected (e.g. duplicate code).
    pub async fn add_account(&self, new: &NewAccount) -> Result<Account, DatabaseError> {
        if new.account_code.trim().is_empty() || new.account_name.trim().is_empty() {
            return Err(DatabaseError::Validation(
                "account code and name are required".into(),
            ));
        }
        self.in_transaction(move || async move {
            let id = self
                .execute_mutation(
                    "INSERT INTO chart_of_accounts (account_code, account_name, account_type, balance)
                     VALUES (?1, ?2, ?3, 0.0)",
                    libsql::params![
                        new.account_code.trim(),
                        new.account_name.trim(),
                        new.account_type.as_str()
                    ],
                )
                .await?;
            let account = self.get_account(id).await?;
            self.append_audit(AuditRecord {
                table: "chart_of_accounts",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&account)?),
            })
            .await?;
            debug!(code = %account.account_code, "account added");
            Ok(account)
        })
        .await
    }

    // -- leads --------------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` when no lead has row id `id`.
    pub async fn get_lead(&self, id: i64) -> Result<Lead, DatabaseError> {
        self.fetch_one(
            &format!("SELECT {LEAD_COLS} FROM leads WHERE id = ?1"),
            libsql::Value::Integer(id),
            row_to_lead,
            "lead",
        )
        .await
    }

    /// Insert a `New` lead, generating `LEAD-nnnn` when no code is given.
    ///
    /// # Errors
    ///
    /// `Validation` for a score outside 0..=100, `Query` when the insert is
    /// rejected (e.g. duplicate code).
    pub async fn add_lead(&self, new: &NewLead) -> Result<Lead, DatabaseError> {
        if !LEAD_SCORE_RANGE.contains(&new.score) {
            return Err(DatabaseError::Validation(format!(
                "lead score {} is outside 0..=100",
                new.score
            )));
        }
        self.in_transaction(move || async move {
            let code = match &new.code {
                Some(code) => code.clone(),
                None => self.next_code("leads", PREFIX_LEAD).await?,
            };
            let id = self
                .execute_mutation(
                    "INSERT INTO leads (lead_id, name, email, phone, company, source, score, interest_level, status, notes)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    libsql::params![
                        code.as_str(),
                        new.name.as_str(),
                        new.email.as_deref(),
                        new.phone.as_deref(),
                        new.company.as_deref(),
                        new.source.as_deref(),
                        new.score,
                        new.interest_level.as_deref(),
                        LEAD_STATUS_NEW,
                        new.notes.as_deref()
                    ],
                )
                .await?;
            let lead = self.get_lead(id).await?;
            self.append_audit(AuditRecord {
                table: "leads",
                record_id: id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(to_json(&lead)?),
            })
            .await?;
            debug!(code = %lead.code, "lead added");
            Ok(lead)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::service::test_support::{empty_service, seeded_service};
    use chrono::NaiveDate;
    use dl_core::enums::AccountType;
    use pretty_assertions::assert_eq;

    fn new_customer(name: &str) -> NewCustomer {
        NewCustomer {
            code: None,
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: None,
            company: Some("Acme".into()),
            industry: Some("Retail".into()),
            status: CustomerStatus::Prospect,
            source: Some("Website".into()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn add_customer_generates_code_and_audits() {
        let service = seeded_service().await;
        let customer = service.add_customer(&new_customer("Ada")).await.unwrap();

        assert_eq!(customer.code, "CUST-0004");
        assert_eq!(customer.status, CustomerStatus::Prospect);
        assert_eq!(customer.total_value, 0.0);

        let audit = service
            .query_audit(&AuditFilter {
                table: Some("customers".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].record_id, customer.id);
        assert_eq!(audit[0].action, AuditAction::Insert);
        assert_eq!(audit[0].changed_by.as_deref(), Some("tester"));
        assert_eq!(audit[0].new_values.as_ref().unwrap()["name"], "Ada");
    }

    #[tokio::test]
    async fn duplicate_code_rolls_back_without_audit() {
        let service = seeded_service().await;
        let mut dup = new_customer("Dup");
        dup.code = Some("CUST-0001".into());

        let err = service.add_customer(&dup).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));
        assert!(service.query_audit(&AuditFilter::default()).await.unwrap().is_empty());
        assert_eq!(service.count_rows("customers").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_customer_status_records_before_and_after() {
        let service = seeded_service().await;
        let updated = service
            .update_customer_status("CUST-0003", CustomerStatus::Active)
            .await
            .unwrap();
        assert_eq!(updated.status, CustomerStatus::Active);

        let audit = service.query_audit(&AuditFilter::default()).await.unwrap();
        assert_eq!(audit[0].action, AuditAction::Update);
        assert_eq!(audit[0].old_values.as_ref().unwrap()["status"], "Prospect");
        assert_eq!(audit[0].new_values.as_ref().unwrap()["status"], "Active");
    }

    #[tokio::test]
    async fn unknown_customer_code_is_not_found() {
        let service = seeded_service().await;
        let err = service
            .update_customer_status("CUST-9999", CustomerStatus::Inactive)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn inventory_item_low_stock_predicate_survives_roundtrip() {
        let service = empty_service().await;
        let item = service
            .add_inventory_item(&NewInventoryItem {
                sku: "DSK-004".into(),
                product_name: "Standing Desk".into(),
                category: Some("Furniture".into()),
                current_stock: 5,
                reorder_point: 5,
                unit_cost: 200.0,
                unit_price: 350.0,
                supplier: None,
                location: Some("Warehouse B".into()),
            })
            .await
            .unwrap();
        assert!(item.is_active);
        assert!(item.is_low_stock());
    }

    #[tokio::test]
    async fn add_employee_is_active_with_generated_code() {
        let service = empty_service().await;
        let employee = service
            .add_employee(&NewEmployee {
                code: None,
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: None,
                phone: None,
                department: Some("Engineering".into()),
                position: Some("Architect".into()),
                hire_date: NaiveDate::from_ymd_opt(2024, 5, 1),
                salary: Some(90_000.0),
                manager_id: None,
            })
            .await
            .unwrap();
        assert_eq!(employee.code, "EMP-0001");
        assert_eq!(employee.status, "Active");
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[tokio::test]
    async fn deal_stage_update_logs_activity() {
        let service = seeded_service().await;
        service
            .add_deal(&NewDeal {
                deal_name: "TechCorp Expansion".into(),
                customer_id: Some(1),
                value: 25_000.0,
                stage: DealStage::Proposal,
                probability: 60,
                close_date: None,
                sales_rep: Some("Sales Rep 1".into()),
                notes: None,
            })
            .await
            .unwrap();

        // Backwards moves are allowed.
        let deal = service
            .update_deal_stage("TechCorp Expansion", DealStage::Lead)
            .await
            .unwrap();
        assert_eq!(deal.stage, DealStage::Lead);

        let mut rows = service
            .db()
            .conn()
            .query("SELECT description FROM sales_activities", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(
            row.get::<String>(0).unwrap(),
            "Updated TechCorp Expansion to Lead"
        );
    }

    #[tokio::test]
    async fn unknown_deal_is_not_found() {
        let service = empty_service().await;
        let err = service
            .update_deal_stage("Nope", DealStage::ClosedWon)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn add_account_opens_at_zero_and_audits() {
        let service = seeded_service().await;
        let account = service
            .add_account(&NewAccount {
                account_code: "1300".into(),
                account_name: "Prepaid Expenses".into(),
                account_type: AccountType::Assets,
            })
            .await
            .unwrap();
        assert_eq!(account.balance, 0.0);
        assert!(account.is_active);
        assert_eq!(account.account_type, AccountType::Assets);
        assert_eq!(service.count_rows("chart_of_accounts").await.unwrap(), 9);

        let audit = service
            .query_audit(&AuditFilter {
                table: Some("chart_of_accounts".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].record_id, account.id);
        assert_eq!(audit[0].new_values.as_ref().unwrap()["account_code"], "1300");
    }

    #[tokio::test]
    async fn duplicate_account_code_is_rejected() {
        let service = seeded_service().await;
        let err = service
            .add_account(&NewAccount {
                account_code: "1000".into(),
                account_name: "Petty Cash".into(),
                account_type: AccountType::Assets,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));
        assert!(service.query_audit(&AuditFilter::default()).await.unwrap().is_empty());

        let err = service
            .add_account(&NewAccount {
                account_code: " ".into(),
                account_name: "Blank".into(),
                account_type: AccountType::Equity,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    fn new_lead(name: &str, score: i64) -> NewLead {
        NewLead {
            code: None,
            name: name.to_string(),
            email: None,
            phone: None,
            company: Some("Startup NG".into()),
            source: Some("Referral".into()),
            score,
            interest_level: Some("High".into()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn add_lead_is_new_with_generated_code() {
        let service = seeded_service().await;
        let first = service.add_lead(&new_lead("Amaka", 75)).await.unwrap();
        let second = service.add_lead(&new_lead("Tunde", 40)).await.unwrap();

        assert_eq!(first.code, "LEAD-0001");
        assert_eq!(second.code, "LEAD-0002");
        assert_eq!(first.status, LEAD_STATUS_NEW);
        assert_eq!(first.score, 75);

        let audit = service
            .query_audit(&AuditFilter {
                table: Some("leads".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(audit.len(), 2);
        assert_eq!(audit[0].action, AuditAction::Insert);
    }

    #[tokio::test]
    async fn lead_score_out_of_range_is_rejected() {
        let service = seeded_service().await;
        let err = service.add_lead(&new_lead("Overeager", 101)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert_eq!(service.count_rows("leads").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invoice_and_expense_flow_into_finance_summary() {
        let service = empty_service().await;
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let invoice = service
            .add_invoice(&NewInvoice {
                invoice_number: None,
                customer_name: "ABC Corp".into(),
                customer_email: None,
                amount: 2500.0,
                invoice_date: date,
                due_date: date + chrono::Days::new(30),
                description: Some("Consulting services".into()),
            })
            .await
            .unwrap();
        assert_eq!(invoice.invoice_number, "INV-0001");
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.created_by.as_deref(), Some("tester"));

        service
            .update_invoice_status("INV-0001", InvoiceStatus::Paid)
            .await
            .unwrap();
        let expense = service
            .add_expense(&NewExpense {
                code: None,
                category: "Travel".into(),
                amount: 800.0,
                expense_date: date,
                vendor: Some("Airlines Inc".into()),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(expense.code, "EXP-0001");
        assert_eq!(expense.status, EXPENSE_STATUS_RECORDED);

        let summary = service.finance_summary().await.unwrap();
        assert_eq!(summary.paid, 2500.0);
        assert_eq!(summary.net_income, 1700.0);
        assert_eq!(service.compute_business_metrics().await.total_revenue, 2500.0);
    }
}
