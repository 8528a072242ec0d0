use serde::Serialize;

use dl_core::entities::AuditLogEntry;
use dl_core::enums::AuditAction;
use dl_core::navigation::Category;
use dl_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::session::require_category;
use crate::context::AppContext;
use crate::output::output;

const DEFAULT_AUDIT_LIMIT: u32 = 50;

#[derive(Debug, Serialize)]
struct AuditResponse {
    entries: Vec<AuditLogEntry>,
}

/// Handle `datalink audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_category(ctx, Category::DatabaseAdmin)?;
    let filter = AuditFilter {
        table: args.table.clone(),
        action: args
            .action
            .as_deref()
            .map(str::parse::<AuditAction>)
            .transpose()?,
        limit: Some(flags.limit.unwrap_or(DEFAULT_AUDIT_LIMIT)),
    };
    let entries = ctx.service.query_audit(&filter).await?;
    output(&AuditResponse { entries }, flags.format)
}
