use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CustomerStatus;

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Customer {
    pub id: i64,
    /// Business code such as `CUST-0001` (column `customer_id`).
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub status: CustomerStatus,
    /// Acquisition channel: `Website`, `Referral`, `Cold Call`, ...
    pub source: Option<String>,
    pub total_value: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_contact: Option<NaiveDate>,
}

/// Fields supplied when adding a customer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewCustomer {
    /// Generated from the row count when absent.
    pub code: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub status: CustomerStatus,
    pub source: Option<String>,
    pub notes: Option<String>,
}
