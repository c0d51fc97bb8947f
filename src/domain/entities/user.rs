//! User projections read from the auth collaborator's table.
//!
//! Users are owned by the authentication system; this service only reads a
//! handful of columns and rewrites the plan fields on paid upgrades.

use chrono::{DateTime, Utc};

/// Minimal user projection used by admin listings and plan lookups.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub plan: String,
    pub created_at: DateTime<Utc>,
}

/// A user's current plan assignment.
#[derive(Debug, Clone)]
pub struct UserPlan {
    pub plan: String,
    pub plan_updated_at: Option<DateTime<Utc>>,
}

impl UserSummary {
    /// Display name for admin views: real name, falling back to email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
