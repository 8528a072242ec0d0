use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{AddCommands, UpdateCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List tables in the database.
    Tables(TablesArgs),
    /// Describe the columns of a table.
    Columns(ColumnsArgs),
    /// Page through the rows of a table.
    Browse(BrowseArgs),
    /// Run an SQL statement.
    Query(QueryArgs),
    /// Dashboard business metrics.
    Metrics,
    /// Revenue KPIs with 30-day growth.
    Kpi(KpiArgs),
    /// Daily revenue trend with rolling means.
    Trend(TrendArgs),
    /// Sales pipeline by stage.
    Pipeline,
    /// Invoice and expense totals.
    Finance,
    /// Inventory at or below its reorder point.
    LowStock,
    /// Active employees per department.
    Headcount,
    /// Export tables to a JSON backup file.
    Backup(BackupArgs),
    /// Replace table contents from a JSON backup file.
    Restore(RestoreArgs),
    /// Add a record.
    Add {
        #[command(subcommand)]
        entity: AddCommands,
    },
    /// Update a record's stage or status.
    Update {
        #[command(subcommand)]
        field: UpdateCommands,
    },
    /// Query the audit log.
    Audit(AuditArgs),
    /// List business categories.
    Categories,
    /// Open a business category.
    Open(OpenArgs),
    /// Print the JSON schema of a record or report type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TablesArgs {
    /// Include column and row counts.
    #[arg(long)]
    pub counts: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ColumnsArgs {
    pub table: String,
}

#[derive(Clone, Debug, Args)]
pub struct BrowseArgs {
    pub table: String,

    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Rows per page (10, 25, 50 or 100; defaults to admin.default_page_size).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Also write the page as CSV (defaults to <table>_export.csv).
    #[arg(long)]
    pub csv: bool,

    /// CSV output path.
    #[arg(long, requires = "csv")]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct QueryArgs {
    pub sql: String,

    /// Positional parameter (JSON literal, or a plain string). Repeatable.
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Allow destructive statements even when the config disables them.
    #[arg(long)]
    pub allow_destructive: bool,
}

/// Where transactions are read from; unset fields come from `[kpi]` config.
#[derive(Clone, Debug, Default, Args)]
pub struct SourceArgs {
    #[arg(long)]
    pub table: Option<String>,
    #[arg(long)]
    pub date_column: Option<String>,
    #[arg(long)]
    pub revenue_column: Option<String>,
    /// Customer column; pass an empty string to count no customers.
    #[arg(long)]
    pub customer_column: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct KpiArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Clone, Debug, Args)]
pub struct TrendArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Short rolling window in days.
    #[arg(long, default_value_t = 7)]
    pub short_window: usize,

    /// Long rolling window in days.
    #[arg(long, default_value_t = 30)]
    pub long_window: usize,
}

#[derive(Clone, Debug, Args)]
pub struct BackupArgs {
    /// Table to include. Repeatable; defaults to admin.backup_tables.
    #[arg(long = "table")]
    pub tables: Vec<String>,

    /// Output path (defaults to datalink_backup_<timestamp>.json).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct RestoreArgs {
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub table: Option<String>,
    /// insert or update.
    #[arg(long)]
    pub action: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct OpenArgs {
    /// Category slug or label (e.g. finance, "Human Resources").
    pub category: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name (e.g. customer, business-metrics). Omit to list names.
    pub type_name: Option<String>,
}
