use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A sales lead that has not yet become a customer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Lead {
    pub id: i64,
    /// Business code such as `LEAD-0001` (column `lead_id`).
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// `Website Form`, `Referral`, `Event`, ...
    pub source: Option<String>,
    /// 0 to 100.
    pub score: i64,
    pub interest_level: Option<String>,
    /// `New` for leads entered through DataLink.
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_contact: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewLead {
    /// Generated from the row count when absent.
    pub code: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub score: i64,
    pub interest_level: Option<String>,
    pub notes: Option<String>,
}
