use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::Local;
use serde::Serialize;

use dl_core::navigation::Category;
use dl_core::responses::{RestoreReport, TableFailure};
use dl_db::repos::backup::{backup_file_name, parse_backup_json, to_backup_json};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{BackupArgs, RestoreArgs};
use crate::commands::shared::session::require_category;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct BackupResponse {
    path: String,
    tables: Vec<TableCount>,
    failed: Vec<TableFailure>,
}

#[derive(Debug, Serialize)]
struct TableCount {
    table: String,
    rows: usize,
}

/// Handle `datalink backup`.
pub async fn backup(args: &BackupArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DatabaseAdmin)?;
    let tables = if args.tables.is_empty() {
        &ctx.config.admin.backup_tables
    } else {
        &args.tables
    };

    let report = ctx.service.backup(tables).await;
    if report.document.is_empty() {
        bail!("no tables were backed up: {}", describe_failures(&report.failed));
    }

    let path = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(backup_file_name(Local::now().naive_local())));
    std::fs::write(&path, to_backup_json(&report.document)?)
        .with_context(|| format!("failed to write backup to {}", path.display()))?;

    let response = BackupResponse {
        path: path.display().to_string(),
        tables: report
            .document
            .iter()
            .map(|(table, rows)| TableCount {
                table: table.clone(),
                rows: rows.len(),
            })
            .collect(),
        failed: report.failed,
    };
    output(&response, flags.format)
}

fn read_backup(path: &Path) -> anyhow::Result<dl_core::responses::BackupDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read backup {}", path.display()))?;
    parse_backup_json(&text).with_context(|| format!("{} is not a DataLink backup", path.display()))
}

/// Handle `datalink restore <file>`.
///
/// Fails only when no table could be restored; partial failures are listed
/// in the report.
pub async fn restore(args: &RestoreArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DatabaseAdmin)?;
    let document = read_backup(&args.file)?;
    let report: RestoreReport = ctx.service.restore(&document).await;
    if !report.any_restored() && !report.failed.is_empty() {
        bail!("restore failed: {}", describe_failures(&report.failed));
    }
    output(&report, flags.format)
}

fn describe_failures(failed: &[TableFailure]) -> String {
    if failed.is_empty() {
        return String::from("no tables selected");
    }
    failed
        .iter()
        .map(|f| format!("{} ({})", f.table, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}
