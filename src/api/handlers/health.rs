//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// The database check queries the plan catalogue, which also catches a
/// missing seed.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;

    let all_healthy = db_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database: db_check },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks database connectivity by querying the plan catalogue.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.plan_service.list_active().await {
        Ok(plans) if !plans.is_empty() => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Connected, {} active plans", plans.len())),
        },
        Ok(_) => CheckStatus {
            status: "error".to_string(),
            message: Some("Plan catalogue is empty".to_string()),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Database error: {}", e)),
        },
    }
}
