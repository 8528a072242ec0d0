use dl_core::navigation::Category;

use crate::context::AppContext;

/// Fail unless the session role may open `category`.
pub fn require_category(ctx: &AppContext, category: Category) -> anyhow::Result<()> {
    ctx.session
        .require(category.required_role())
        .map_err(|error| anyhow::anyhow!("{} is not available: {error}", category.label()))
}
