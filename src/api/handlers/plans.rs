//! Handlers for the plan catalogue and the caller's plan.

use axum::{Extension, Json, extract::State};

use crate::api::dto::plans::{PlanListResponse, PlanResponse, UserPlanResponse};
use crate::api::middleware::auth::AuthedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists active plans, cheapest first.
///
/// # Endpoint
///
/// `GET /api/plans` (public)
pub async fn plans_handler(
    State(state): State<AppState>,
) -> Result<Json<PlanListResponse>, AppError> {
    let plans = state.plan_service.list_active().await?;

    Ok(Json(PlanListResponse {
        plans: plans.into_iter().map(PlanResponse::from).collect(),
    }))
}

/// Returns the signed-in caller's current plan.
///
/// # Endpoint
///
/// `GET /api/me/plan` (Bearer auth)
pub async fn user_plan_handler(
    State(state): State<AppState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
) -> Result<Json<UserPlanResponse>, AppError> {
    let plan = state.plan_service.plan_for_user(user_id).await?;

    Ok(Json(plan.into()))
}
