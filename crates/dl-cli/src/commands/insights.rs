//! Read-only business summaries: dashboard metrics, KPIs, trend, pipeline,
//! finance, low stock, and headcount.

use serde::Serialize;

use dl_core::entities::InventoryItem;
use dl_core::kpi::{daily_trend, get_kpi_metrics};
use dl_core::navigation::Category;
use dl_db::repos::metrics::TransactionSource;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{KpiArgs, SourceArgs, TrendArgs};
use crate::commands::shared::session::require_category;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LowStockResponse {
    items: Vec<InventoryItem>,
}

/// Configured transaction source with command-line overrides applied.
pub fn transaction_source(args: &SourceArgs, ctx: &AppContext) -> TransactionSource {
    let mut source = TransactionSource::from(&ctx.config.kpi);
    if let Some(table) = &args.table {
        source.table.clone_from(table);
    }
    if let Some(column) = &args.date_column {
        source.date_column.clone_from(column);
    }
    if let Some(column) = &args.revenue_column {
        source.revenue_column.clone_from(column);
    }
    if let Some(column) = &args.customer_column {
        source.customer_column = (!column.is_empty()).then(|| column.clone());
    }
    source
}

/// Handle `datalink metrics`.
pub async fn metrics(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::Dashboard)?;
    output(&ctx.service.compute_business_metrics().await, flags.format)
}

/// Handle `datalink kpi`.
pub async fn kpi(args: &KpiArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DataAnalysis)?;
    let source = transaction_source(&args.source, ctx);
    let transactions = ctx.service.load_transactions(&source).await?;
    output(&get_kpi_metrics(&transactions), flags.format)
}

/// Handle `datalink trend`.
pub async fn trend(args: &TrendArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DataAnalysis)?;
    let source = transaction_source(&args.source, ctx);
    let transactions = ctx.service.load_transactions(&source).await?;
    let mut report = daily_trend(&transactions, args.short_window, args.long_window);
    if let Some(keep) = flags.row_limit() {
        // Keep the most recent days.
        let skip = report.points.len().saturating_sub(keep);
        report.points.drain(..skip);
    }
    output(&report, flags.format)
}

/// Handle `datalink pipeline`.
pub async fn pipeline(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::Sales)?;
    output(&ctx.service.pipeline().await?, flags.format)
}

/// Handle `datalink finance`.
pub async fn finance(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::Finance)?;
    output(&ctx.service.finance_summary().await?, flags.format)
}

/// Handle `datalink low-stock`.
pub async fn low_stock(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::Logistics)?;
    let mut items = ctx.service.low_stock_items().await?;
    if let Some(limit) = flags.row_limit() {
        items.truncate(limit);
    }
    output(&LowStockResponse { items }, flags.format)
}

/// Handle `datalink headcount`.
pub async fn headcount(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::HumanResources)?;
    output(&ctx.service.department_headcount().await?, flags.format)
}
