use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Tables(args) => commands::admin::tables(&args, ctx, flags).await,
        Commands::Columns(args) => commands::admin::columns(&args, ctx, flags).await,
        Commands::Browse(args) => commands::admin::browse(&args, ctx, flags).await,
        Commands::Query(args) => commands::admin::query(&args, ctx, flags).await,
        Commands::Metrics => commands::insights::metrics(ctx, flags).await,
        Commands::Kpi(args) => commands::insights::kpi(&args, ctx, flags).await,
        Commands::Trend(args) => commands::insights::trend(&args, ctx, flags).await,
        Commands::Pipeline => commands::insights::pipeline(ctx, flags).await,
        Commands::Finance => commands::insights::finance(ctx, flags).await,
        Commands::LowStock => commands::insights::low_stock(ctx, flags).await,
        Commands::Headcount => commands::insights::headcount(ctx, flags).await,
        Commands::Backup(args) => commands::backup::backup(&args, ctx, flags).await,
        Commands::Restore(args) => commands::backup::restore(&args, ctx, flags).await,
        Commands::Add { entity } => commands::add::handle(&entity, ctx, flags).await,
        Commands::Update { field } => commands::update::handle(&field, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Open(args) => commands::navigation::open(&args, ctx, flags).await,
        Commands::Categories | Commands::Schema(_) => {
            unreachable!("categories/schema are pre-dispatched in main")
        }
    }
}
