use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProjectStatus;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Project {
    pub id: i64,
    pub project_name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    /// Completion in percent, 0..=100.
    pub progress: i64,
    pub budget: Option<f64>,
    pub team_size: i64,
    pub project_manager: Option<String>,
    pub client: Option<String>,
    pub priority: String,
}
