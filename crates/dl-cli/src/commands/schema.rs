use anyhow::bail;
use schemars::{Schema, schema_for};
use serde::Serialize;

use dl_core::entities::{
    Account, AuditLogEntry, Customer, Deal, Employee, Expense, InventoryItem, Invoice, Lead,
    Project,
};
use dl_core::kpi::{KpiMetrics, TrendReport};
use dl_core::navigation::CategoryInfo;
use dl_core::pipeline::PipelineSummary;
use dl_core::responses::{
    BusinessMetrics, ColumnInfo, DepartmentHeadcount, FinanceSummary, QueryOutcome,
    RestoreReport, TablePage, TableSummary,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Type names accepted by `datalink schema`, in listing order.
const TYPE_NAMES: &[&str] = &[
    "customer",
    "lead",
    "deal",
    "employee",
    "invoice",
    "expense",
    "account",
    "inventory-item",
    "project",
    "audit-entry",
    "business-metrics",
    "kpi-metrics",
    "trend-report",
    "pipeline-summary",
    "finance-summary",
    "department-headcount",
    "column-info",
    "table-summary",
    "table-page",
    "query-outcome",
    "restore-report",
    "category",
];

#[derive(Debug, Serialize)]
struct SchemaListResponse {
    types: &'static [&'static str],
}

fn schema_by_name(name: &str) -> Option<Schema> {
    let schema = match name {
        "customer" => schema_for!(Customer),
        "lead" => schema_for!(Lead),
        "deal" => schema_for!(Deal),
        "employee" => schema_for!(Employee),
        "invoice" => schema_for!(Invoice),
        "expense" => schema_for!(Expense),
        "account" => schema_for!(Account),
        "inventory-item" => schema_for!(InventoryItem),
        "project" => schema_for!(Project),
        "audit-entry" => schema_for!(AuditLogEntry),
        "business-metrics" => schema_for!(BusinessMetrics),
        "kpi-metrics" => schema_for!(KpiMetrics),
        "trend-report" => schema_for!(TrendReport),
        "pipeline-summary" => schema_for!(PipelineSummary),
        "finance-summary" => schema_for!(FinanceSummary),
        "department-headcount" => schema_for!(DepartmentHeadcount),
        "column-info" => schema_for!(ColumnInfo),
        "table-summary" => schema_for!(TableSummary),
        "table-page" => schema_for!(TablePage),
        "query-outcome" => schema_for!(QueryOutcome),
        "restore-report" => schema_for!(RestoreReport),
        "category" => schema_for!(CategoryInfo),
        _ => return None,
    };
    Some(schema)
}

/// Handle `datalink schema [type]`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(name) = args.type_name.as_deref() else {
        return output(&SchemaListResponse { types: TYPE_NAMES }, flags.format);
    };
    let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
    match schema_by_name(&normalized) {
        Some(schema) => output(&schema, flags.format),
        None => bail!(
            "unknown schema type '{name}' (expected one of: {})",
            TYPE_NAMES.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{TYPE_NAMES, schema_by_name};

    #[test]
    fn every_listed_type_has_a_schema() {
        for name in TYPE_NAMES {
            let schema = schema_by_name(name).unwrap_or_else(|| panic!("missing {name}"));
            let value = serde_json::to_value(&schema).unwrap();
            assert!(value.is_object(), "{name}");
        }
    }

    #[test]
    fn customer_schema_lists_code_and_status() {
        let schema = schema_by_name("customer").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        let properties = value["properties"].as_object().unwrap();
        assert!(properties.contains_key("code"));
        assert!(properties.contains_key("status"));
    }

    #[test]
    fn unknown_type_has_no_schema() {
        assert!(schema_by_name("spaceship").is_none());
    }
}
