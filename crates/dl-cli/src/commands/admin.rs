//! Database Admin commands: introspection, browsing, and the SQL console.

use std::path::PathBuf;

use anyhow::{Context, bail};
use serde::Serialize;

use dl_config::PAGE_SIZES;
use dl_core::navigation::Category;
use dl_core::responses::{QueryOutcome, TablePage};
use dl_db::repos::query::ExecutionPolicy;

use crate::cli::root_commands::{BrowseArgs, ColumnsArgs, QueryArgs, TablesArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::parse_param;
use crate::commands::shared::session::require_category;
use crate::context::AppContext;
use crate::output::{csv, output, render_result_set};

#[derive(Debug, Serialize)]
struct TablesResponse {
    tables: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BrowseResponse<'a> {
    #[serde(flatten)]
    page: &'a TablePage,
    #[serde(skip_serializing_if = "Option::is_none")]
    csv_path: Option<String>,
}

/// Handle `datalink tables`.
pub async fn tables(args: &TablesArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DatabaseAdmin)?;
    if args.counts {
        let overview = ctx.service.database_overview().await?;
        return output(&overview, flags.format);
    }
    let tables = ctx.service.list_tables().await?;
    output(&TablesResponse { tables }, flags.format)
}

/// Handle `datalink columns <table>`.
pub async fn columns(args: &ColumnsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DatabaseAdmin)?;
    let columns = ctx.service.describe_table(&args.table).await?;
    output(&columns, flags.format)
}

fn page_size(requested: Option<u32>, configured: u32) -> anyhow::Result<u32> {
    let size = requested.unwrap_or(configured);
    if !PAGE_SIZES.contains(&size) {
        bail!("invalid page size {size} (expected one of {PAGE_SIZES:?})");
    }
    Ok(size)
}

fn default_csv_path(table: &str) -> PathBuf {
    PathBuf::from(format!("{table}_export.csv"))
}

/// Handle `datalink browse <table>`.
pub async fn browse(args: &BrowseArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DatabaseAdmin)?;
    let size = page_size(args.page_size, ctx.config.admin.default_page_size)?;
    let page = ctx
        .service
        .fetch_page(&args.table, u64::from(size), args.page)
        .await?;

    let csv_path = if args.csv {
        let path = args
            .out
            .clone()
            .unwrap_or_else(|| default_csv_path(&page.table));
        csv::write_csv(&page.result, &path)?;
        tracing::info!(path = %path.display(), rows = page.result.len(), "page exported");
        Some(path.display().to_string())
    } else {
        None
    };

    if flags.is_table() {
        println!(
            "{} - page {} of {} ({} rows)",
            page.table, page.page, page.total_pages, page.total_rows
        );
        println!("{}", render_result_set(&page.result));
        if let Some(path) = csv_path {
            println!("exported to {path}");
        }
        return Ok(());
    }
    output(
        &BrowseResponse {
            page: &page,
            csv_path,
        },
        flags.format,
    )
}

/// Handle `datalink query <sql>`.
pub async fn query(args: &QueryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DatabaseAdmin)?;
    let policy = ExecutionPolicy {
        allow_destructive: args.allow_destructive || ctx.config.admin.allow_destructive_sql,
    };
    let params = args.params.iter().map(|raw| parse_param(raw)).collect::<Vec<_>>();
    let params = (!params.is_empty()).then_some(params.as_slice());

    let outcome = ctx
        .service
        .execute(&args.sql, params, policy)
        .await
        .context("query failed")?;

    match (&outcome, flags.format) {
        (QueryOutcome::Rows(result), OutputFormat::Table) => {
            println!("{}", render_result_set(result));
            Ok(())
        }
        (QueryOutcome::Affected { rows_affected }, OutputFormat::Table) => {
            println!("{rows_affected} row(s) affected");
            Ok(())
        }
        _ => output(&outcome, flags.format),
    }
}
