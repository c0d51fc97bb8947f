//! Repository trait for the plan catalogue.

use async_trait::async_trait;

use crate::domain::entities::{NewPlan, Plan};
use crate::error::AppError;

/// Repository interface for plan records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Finds an active plan by name. Inactive plans are invisible here so
    /// retired catalogue entries stop driving expiry assignment.
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Plan>, AppError>;

    /// Lists active plans ordered by price, cheapest first.
    async fn list_active(&self) -> Result<Vec<Plan>, AppError>;

    /// Total number of plan records, active or not.
    async fn count(&self) -> Result<i64, AppError>;

    /// Inserts a plan record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is already taken.
    async fn create(&self, new_plan: NewPlan) -> Result<Plan, AppError>;
}
