//! Plan catalogue reads and first-boot seeding.

use std::sync::Arc;

use crate::domain::entities::{FREE_PLAN, Plan, UserPlan, default_plans};
use crate::domain::repositories::{PlanRepository, UserRepository};
use crate::error::AppError;

pub struct PlanService {
    plan_repository: Arc<dyn PlanRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl PlanService {
    pub fn new(
        plan_repository: Arc<dyn PlanRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            plan_repository,
            user_repository,
        }
    }

    /// Active plans, cheapest first.
    pub async fn list_active(&self) -> Result<Vec<Plan>, AppError> {
        self.plan_repository.list_active().await
    }

    /// The signed-in user's current plan assignment.
    ///
    /// Users created before the plan column existed have no assignment;
    /// they are reported as `free` with no change date.
    pub async fn plan_for_user(&self, user_id: i64) -> Result<UserPlan, AppError> {
        let plan = self
            .user_repository
            .plan_of(user_id)
            .await?
            .unwrap_or_else(|| UserPlan {
                plan: FREE_PLAN.to_string(),
                plan_updated_at: None,
            });

        Ok(plan)
    }

    /// Inserts the default catalogue when the plans table is empty.
    ///
    /// A non-empty table is left untouched so operator edits survive
    /// restarts. Returns how many plans were inserted.
    pub async fn seed_defaults(&self) -> Result<usize, AppError> {
        if self.plan_repository.count().await? > 0 {
            return Ok(0);
        }

        let defaults = default_plans();
        let inserted = defaults.len();

        for plan in defaults {
            self.plan_repository.create(plan).await?;
        }

        tracing::info!(count = inserted, "Seeded default plan catalogue");
        Ok(inserted)
    }
}
