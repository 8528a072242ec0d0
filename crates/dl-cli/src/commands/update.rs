use dl_core::enums::{CustomerStatus, DealStage, InvoiceStatus};
use dl_core::navigation::Category;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UpdateCommands;
use crate::commands::shared::session::require_category;
use crate::context::AppContext;
use crate::output::output;

/// Handle `datalink update <field>`.
pub async fn handle(field: &UpdateCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match field {
        UpdateCommands::DealStage { deal, stage } => {
            require_category(ctx, Category::Sales)?;
            let stage = stage.parse::<DealStage>()?;
            output(&ctx.service.update_deal_stage(deal, stage).await?, flags.format)
        }
        UpdateCommands::CustomerStatus { code, status } => {
            require_category(ctx, Category::Sales)?;
            let status = status.parse::<CustomerStatus>()?;
            output(&ctx.service.update_customer_status(code, status).await?, flags.format)
        }
        UpdateCommands::InvoiceStatus { number, status } => {
            require_category(ctx, Category::Finance)?;
            let status = status.parse::<InvoiceStatus>()?;
            output(&ctx.service.update_invoice_status(number, status).await?, flags.format)
        }
    }
}
