use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AccountType, InvoiceStatus};

/// An issued invoice. Paid invoices make up the dashboard revenue figure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub amount: f64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewInvoice {
    pub invoice_number: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub amount: f64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub description: Option<String>,
}

/// A recorded business expense.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Expense {
    pub id: i64,
    /// Business code such as `EXP-0001` (column `expense_id`).
    pub code: String,
    pub category: String,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub vendor: Option<String>,
    pub description: Option<String>,
    /// Always `Recorded` for expenses entered through DataLink.
    pub status: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewExpense {
    pub code: Option<String>,
    pub category: String,
    pub amount: f64,
    pub expense_date: NaiveDate,
    pub vendor: Option<String>,
    pub description: Option<String>,
}

/// An entry in the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Account {
    pub id: i64,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when adding an account. New accounts open at a zero
/// balance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewAccount {
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
}
