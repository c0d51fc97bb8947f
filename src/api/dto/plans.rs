//! DTOs for the plan catalogue and the caller's plan.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{Plan, UserPlan};

/// A purchasable plan as rendered in the public catalogue.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub name: String,
    pub display_name: String,
    pub price_cents: i64,
    /// `null` means links under this plan never expire.
    pub link_expiry_days: Option<i32>,
    pub custom_alias_allowed: bool,
    pub features: Vec<String>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            name: plan.name,
            display_name: plan.display_name,
            price_cents: plan.price_cents,
            link_expiry_days: plan.link_expiry_days,
            custom_alias_allowed: plan.custom_alias_allowed,
            features: plan.features,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<PlanResponse>,
}

/// The signed-in caller's current plan assignment.
#[derive(Debug, Serialize)]
pub struct UserPlanResponse {
    pub plan: String,
    pub plan_updated_at: Option<DateTime<Utc>>,
}

impl From<UserPlan> for UserPlanResponse {
    fn from(user_plan: UserPlan) -> Self {
        Self {
            plan: user_plan.plan,
            plan_updated_at: user_plan.plan_updated_at,
        }
    }
}
