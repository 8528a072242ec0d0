//! Category navigator: lists the catalog and renders an opened category.

use serde::Serialize;

use dl_config::DataLinkConfig;
use dl_core::enums::Role;
use dl_core::kpi::get_kpi_metrics;
use dl_core::navigation::{Category, CategoryInfo, catalog};
use dl_db::repos::metrics::TransactionSource;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::OpenArgs;
use crate::context::AppContext;
use crate::output::output;

const SERVICES_TABLE: &str = "projects";
const SERVICES_PAGE_SIZE: u64 = 10;

#[derive(Debug, Serialize)]
struct CategoryEntry {
    #[serde(flatten)]
    info: CategoryInfo,
    available: bool,
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Serialize)]
struct OpenResponse<T: Serialize> {
    category: &'static str,
    user: String,
    data: T,
}

fn entries_for(role: Role) -> Vec<CategoryEntry> {
    catalog()
        .into_iter()
        .map(|info| CategoryEntry {
            available: role.includes(info.required_role),
            info,
        })
        .collect()
}

/// Handle `datalink categories`. Needs config for the session role but no
/// database.
pub fn categories(config: &DataLinkConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let role = config.session.role()?;
    output(
        &CategoriesResponse {
            categories: entries_for(role),
        },
        flags.format,
    )
}

/// Handle `datalink open <category>`.
pub async fn open(args: &OpenArgs, ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let category = args.category.parse::<Category>()?;
    ctx.session.select_category(category)?;
    let user = ctx.session.username().to_string();
    let service = &ctx.service;

    macro_rules! respond {
        ($data:expr) => {
            output(
                &OpenResponse {
                    category: category.label(),
                    user,
                    data: $data,
                },
                flags.format,
            )
        };
    }

    match category {
        Category::Dashboard => respond!(service.compute_business_metrics().await),
        Category::DataAnalysis => {
            let source = TransactionSource::from(&ctx.config.kpi);
            let transactions = service.load_transactions(&source).await?;
            respond!(get_kpi_metrics(&transactions))
        }
        Category::Finance => respond!(service.finance_summary().await?),
        Category::Sales => respond!(service.pipeline().await?),
        Category::Logistics => respond!(service.low_stock_items().await?),
        Category::HumanResources => respond!(service.department_headcount().await?),
        Category::Services => {
            respond!(service.fetch_page(SERVICES_TABLE, SERVICES_PAGE_SIZE, 1).await?)
        }
        Category::Productivity => respond!(category.modules()),
        Category::DatabaseAdmin => respond!(service.database_overview().await?),
    }
}
