//! Business category catalog.
//!
//! Categories group the modules an operator can open. The catalog is static;
//! what each category renders is decided by the CLI navigator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::enums::Role;
use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Dashboard,
    DataAnalysis,
    Finance,
    Sales,
    Logistics,
    HumanResources,
    Services,
    Productivity,
    DatabaseAdmin,
}

impl Category {
    /// Catalog order.
    pub const ALL: &'static [Self] = &[
        Self::Dashboard,
        Self::DataAnalysis,
        Self::Finance,
        Self::Sales,
        Self::Logistics,
        Self::HumanResources,
        Self::Services,
        Self::Productivity,
        Self::DatabaseAdmin,
    ];

    /// Kebab-case identifier used on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::DataAnalysis => "data-analysis",
            Self::Finance => "finance",
            Self::Sales => "sales",
            Self::Logistics => "logistics",
            Self::HumanResources => "human-resources",
            Self::Services => "services",
            Self::Productivity => "productivity",
            Self::DatabaseAdmin => "database-admin",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::DataAnalysis => "Data Analysis",
            Self::Finance => "Finance",
            Self::Sales => "Sales",
            Self::Logistics => "Logistics",
            Self::HumanResources => "Human Resources",
            Self::Services => "Services",
            Self::Productivity => "Productivity",
            Self::DatabaseAdmin => "Database Admin",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Dashboard => "Overview of your business operations",
            Self::DataAnalysis => "Analytics, reporting, and business intelligence",
            Self::Finance => "Financial management and accounting",
            Self::Sales => "Customer relationship and sales management",
            Self::Logistics => "Inventory, manufacturing, and supply chain",
            Self::HumanResources => "Employee management and HR operations",
            Self::Services => "Project management and service delivery",
            Self::Productivity => "Communication, collaboration, and knowledge management",
            Self::DatabaseAdmin => "Database management and administration",
        }
    }

    #[must_use]
    pub const fn modules(self) -> &'static [&'static str] {
        match self {
            Self::Dashboard => &["Business Overview", "Quick Stats", "Recent Activity"],
            Self::DataAnalysis => &[
                "Dashboard Analytics",
                "Data Upload",
                "Advanced Analytics",
                "Reports",
                "Collaboration",
            ],
            Self::Finance => &[
                "Accounting",
                "Invoicing",
                "Expenses Tracking",
                "Spreadsheets (BI)",
                "Documents Management",
            ],
            Self::Sales => &[
                "CRM Systems",
                "Sales Processes",
                "Lead Management",
                "Deal Tracking",
                "Customer Analytics",
            ],
            Self::Logistics => &[
                "Inventory Management",
                "Manufacturing",
                "PLM (Product Lifecycle)",
                "Purchase Orders",
                "Maintenance",
            ],
            Self::HumanResources => &[
                "Employee Management",
                "Recruitment",
                "Referrals",
                "Fleet Management",
                "Time Off",
                "Appraisals",
            ],
            Self::Services => &[
                "Project Management",
                "Timesheets",
                "Field Service",
                "Service Analytics",
            ],
            Self::Productivity => &[
                "Discuss",
                "Approvals",
                "Knowledge Base",
                "Team Collaboration",
                "Workflow Automation",
            ],
            Self::DatabaseAdmin => &[
                "View Tables",
                "Manage Data",
                "Backup & Restore",
                "Query Interface",
            ],
        }
    }

    /// Lowest role allowed to open the category.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::DatabaseAdmin => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Accepts the slug (`database-admin`) or the label (`Database Admin`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.slug() == wanted)
            .ok_or_else(|| CoreError::NotFound {
                kind: "category".to_string(),
                name: s.to_string(),
            })
    }
}

/// Serializable view of one catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CategoryInfo {
    pub slug: String,
    pub label: String,
    pub description: String,
    pub modules: Vec<String>,
    pub required_role: Role,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            slug: category.slug().to_string(),
            label: category.label().to_string(),
            description: category.description().to_string(),
            modules: category.modules().iter().map(|m| (*m).to_string()).collect(),
            required_role: category.required_role(),
        }
    }
}

/// The whole catalog, in display order.
#[must_use]
pub fn catalog() -> Vec<CategoryInfo> {
    Category::ALL.iter().copied().map(CategoryInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slug_and_label() {
        assert_eq!("database-admin".parse::<Category>().unwrap(), Category::DatabaseAdmin);
        assert_eq!("Human Resources".parse::<Category>().unwrap(), Category::HumanResources);
        assert_eq!("data_analysis".parse::<Category>().unwrap(), Category::DataAnalysis);
    }

    #[test]
    fn unknown_category_is_not_found() {
        let err = "warehouse".parse::<Category>().unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn slug_matches_serde() {
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json.as_str(), Some(category.slug()));
        }
    }

    #[test]
    fn catalog_lists_every_category_with_modules() {
        let entries = catalog();
        assert_eq!(entries.len(), 9);
        assert!(entries.iter().all(|entry| !entry.modules.is_empty()));
        assert_eq!(entries[8].required_role, Role::Admin);
    }
}
