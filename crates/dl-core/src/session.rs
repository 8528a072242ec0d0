//! Per-session operator context.
//!
//! Holds who is operating and which category is selected. Created on login,
//! passed explicitly to every handler, and consumed on logout; nothing about
//! a session lives in process-wide state.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::enums::Role;
use crate::errors::CoreError;
use crate::navigation::Category;

#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    username: String,
    role: Role,
    selected_category: Option<Category>,
    started_at: DateTime<Utc>,
}

impl SessionContext {
    #[must_use]
    pub fn login(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
            selected_category: None,
            started_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub const fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    #[must_use]
    pub const fn has_permission(&self, required: Role) -> bool {
        self.role.includes(required)
    }

    /// Fail with `PermissionDenied` unless the session role covers `required`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PermissionDenied` when the role is too low.
    pub fn require(&self, required: Role) -> Result<(), CoreError> {
        if self.has_permission(required) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                required: required.to_string(),
                current: self.role.to_string(),
            })
        }
    }

    /// Select a category, checking its required role first.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PermissionDenied` when the role is too low; the
    /// previous selection is kept.
    pub fn select_category(&mut self, category: Category) -> Result<(), CoreError> {
        self.require(category.required_role())?;
        self.selected_category = Some(category);
        Ok(())
    }

    /// End the session and return how long it lasted.
    #[must_use]
    pub fn logout(self) -> TimeDelta {
        Utc::now() - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_starts_without_selection() {
        let session = SessionContext::login("admin", Role::Admin);
        assert_eq!(session.username(), "admin");
        assert_eq!(session.selected_category(), None);
    }

    #[test]
    fn admin_can_open_database_admin() {
        let mut session = SessionContext::login("admin", Role::Admin);
        session.select_category(Category::DatabaseAdmin).unwrap();
        assert_eq!(session.selected_category(), Some(Category::DatabaseAdmin));
    }

    #[test]
    fn analyst_is_denied_database_admin_and_keeps_selection() {
        let mut session = SessionContext::login("analyst", Role::Analyst);
        session.select_category(Category::Finance).unwrap();

        let err = session.select_category(Category::DatabaseAdmin).unwrap_err();
        assert!(err.to_string().contains("Admin role required"));
        assert_eq!(session.selected_category(), Some(Category::Finance));
    }

    #[test]
    fn logout_reports_non_negative_duration() {
        let session = SessionContext::login("demo", Role::User);
        assert!(session.logout() >= TimeDelta::zero());
    }
}
