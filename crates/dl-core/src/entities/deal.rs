use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DealStage;

/// A sales opportunity moving through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Deal {
    pub id: i64,
    pub deal_name: String,
    /// Row id of the linked customer, if any.
    pub customer_id: Option<i64>,
    pub value: f64,
    pub stage: DealStage,
    /// Win probability in percent.
    pub probability: i64,
    pub close_date: Option<NaiveDate>,
    pub sales_rep: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewDeal {
    pub deal_name: String,
    pub customer_id: Option<i64>,
    pub value: f64,
    pub stage: DealStage,
    pub probability: i64,
    pub close_date: Option<NaiveDate>,
    pub sales_rep: Option<String>,
    pub notes: Option<String>,
}
