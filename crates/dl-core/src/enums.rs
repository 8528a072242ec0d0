//! Status, stage, and role enums for DataLink.
//!
//! Every enum is persisted as its display label (`"Closed Won"`, `"In Progress"`)
//! because that is what the business tables hold and what the aggregate
//! queries filter on. `FromStr` accepts the label case-insensitively and also
//! the snake/kebab spelling (`closed-won`, `in_progress`) for CLI input.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Normalize a label for comparison: lowercase, `-`/`_` become spaces.
fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

fn parse_label<T: Copy>(
    raw: &str,
    all: &[T],
    label: fn(T) -> &'static str,
    field: &str,
) -> Result<T, CoreError> {
    let wanted = normalize(raw);
    all.iter()
        .copied()
        .find(|candidate| normalize(label(*candidate)) == wanted)
        .ok_or_else(|| {
            let expected = all.iter().map(|c| label(*c)).collect::<Vec<_>>().join(", ");
            CoreError::Validation(format!("invalid {field} '{raw}' (expected one of: {expected})"))
        })
}

// ---------------------------------------------------------------------------
// CustomerStatus
// ---------------------------------------------------------------------------

/// Classification of a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CustomerStatus {
    Active,
    Prospect,
    Inactive,
}

impl CustomerStatus {
    pub const ALL: &'static [Self] = &[Self::Active, Self::Prospect, Self::Inactive];

    /// Return the label used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Prospect => "Prospect",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, Self::ALL, Self::as_str, "customer status")
    }
}

// ---------------------------------------------------------------------------
// DealStage
// ---------------------------------------------------------------------------

/// Pipeline stage of a deal.
///
/// ```text
/// Lead → Qualified → Proposal → Negotiation → Closed Won
///                                           → Closed Lost
/// ```
///
/// The order is used for reporting only. Any stage may move to any other
/// stage; no transition rules are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl DealStage {
    /// All stages in pipeline order.
    pub const ALL: &'static [Self] = &[
        Self::Lead,
        Self::Qualified,
        Self::Proposal,
        Self::Negotiation,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Qualified => "Qualified",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }

    /// Whether the deal has left the open pipeline.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, Self::ALL, Self::as_str, "deal stage")
    }
}

// ---------------------------------------------------------------------------
// InvoiceStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: &'static [Self] = &[Self::Pending, Self::Paid, Self::Overdue];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, Self::ALL, Self::as_str, "invoice status")
    }
}

// ---------------------------------------------------------------------------
// AccountType
// ---------------------------------------------------------------------------

/// Section of the chart of accounts an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AccountType {
    Assets,
    Liabilities,
    Equity,
    Revenue,
    Expenses,
}

impl AccountType {
    pub const ALL: &'static [Self] = &[
        Self::Assets,
        Self::Liabilities,
        Self::Equity,
        Self::Revenue,
        Self::Expenses,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Liabilities => "Liabilities",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expenses => "Expenses",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, Self::ALL, Self::as_str, "account type")
    }
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Project status. `Planning` and `In Progress` count as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ProjectStatus {
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl ProjectStatus {
    pub const ALL: &'static [Self] = &[
        Self::Planning,
        Self::InProgress,
        Self::Completed,
        Self::OnHold,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Planning | Self::InProgress)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, Self::ALL, Self::as_str, "project status")
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Operator role. Higher roles include every permission of lower ones.
///
/// ```text
/// User (1) < Analyst (2) < Manager (3) < Admin (4)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Role {
    User,
    Analyst,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: &'static [Self] = &[Self::User, Self::Analyst, Self::Manager, Self::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Analyst => "Analyst",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }

    /// Position in the role hierarchy.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::User => 1,
            Self::Analyst => 2,
            Self::Manager => 3,
            Self::Admin => 4,
        }
    }

    /// Whether this role satisfies a `required` role.
    #[must_use]
    pub const fn includes(self, required: Self) -> bool {
        self.level() >= required.level()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, Self::ALL, Self::as_str, "role")
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Insert,
    Update,
}

impl AuditAction {
    pub const ALL: &'static [Self] = &[Self::Insert, Self::Update];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, Self::ALL, Self::as_str, "audit action")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Closed Won", DealStage::ClosedWon)]
    #[case("closed-won", DealStage::ClosedWon)]
    #[case("CLOSED_LOST", DealStage::ClosedLost)]
    #[case("  negotiation ", DealStage::Negotiation)]
    fn deal_stage_parses_label_variants(#[case] raw: &str, #[case] expected: DealStage) {
        assert_eq!(raw.parse::<DealStage>().unwrap(), expected);
    }

    #[test]
    fn deal_stage_rejects_unknown_label() {
        let err = "Won".parse::<DealStage>().unwrap_err();
        assert!(err.to_string().contains("invalid deal stage 'Won'"));
    }

    #[test]
    fn serde_uses_storage_labels() {
        assert_eq!(
            serde_json::to_string(&DealStage::ClosedWon).unwrap(),
            "\"Closed Won\""
        );
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        let status: InvoiceStatus = serde_json::from_str("\"Overdue\"").unwrap();
        assert_eq!(status, InvoiceStatus::Overdue);
    }

    #[test]
    fn as_str_matches_serde_for_every_stage() {
        for stage in DealStage::ALL {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json.as_str(), Some(stage.as_str()));
        }
    }

    #[test]
    fn closed_stages() {
        assert!(DealStage::ClosedWon.is_closed());
        assert!(DealStage::ClosedLost.is_closed());
        assert!(!DealStage::Negotiation.is_closed());
    }

    #[test]
    fn role_hierarchy() {
        assert!(Role::Admin.includes(Role::Manager));
        assert!(Role::Manager.includes(Role::Manager));
        assert!(!Role::Analyst.includes(Role::Manager));
        assert!(Role::User.includes(Role::User));
    }

    #[test]
    fn account_types_parse_case_insensitively() {
        assert_eq!("liabilities".parse::<AccountType>().unwrap(), AccountType::Liabilities);
        assert!("Income".parse::<AccountType>().is_err());
    }

    #[test]
    fn active_project_statuses() {
        assert!(ProjectStatus::Planning.is_active());
        assert!(ProjectStatus::InProgress.is_active());
        assert!(!ProjectStatus::Completed.is_active());
        assert!(!ProjectStatus::OnHold.is_active());
        assert_eq!("on-hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
    }
}
