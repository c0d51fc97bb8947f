//! Repository trait for the auth collaborator's users table.
//!
//! This service does not own users. It reads plan assignments and contact
//! columns, and rewrites the plan fields when a payment completes.

use async_trait::async_trait;

use crate::domain::entities::{UserPlan, UserSummary};
use crate::error::AppError;

/// Repository interface for user plan lookups and admin projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the user's current plan assignment, or `None` if the user
    /// does not exist.
    async fn plan_of(&self, user_id: i64) -> Result<Option<UserPlan>, AppError>;

    /// Rewrites the user's plan after a completed checkout.
    ///
    /// Also records `plan_updated_at = now()` and the provider session id for
    /// audit. Returns `Ok(false)` when the user does not exist.
    async fn set_plan(
        &self,
        user_id: i64,
        plan: &str,
        provider_session_id: &str,
    ) -> Result<bool, AppError>;

    /// Total number of users.
    async fn count(&self) -> Result<i64, AppError>;

    /// Number of users on a paid (non-free) plan.
    async fn count_on_paid_plans(&self) -> Result<i64, AppError>;

    /// The `limit` most recently created users.
    async fn recent(&self, limit: i64) -> Result<Vec<UserSummary>, AppError>;

    /// Summaries for a set of user ids, used to annotate admin link listings.
    async fn summaries_by_ids(&self, ids: Vec<i64>) -> Result<Vec<UserSummary>, AppError>;
}
