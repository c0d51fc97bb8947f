//! Handlers for checkout creation and the provider webhook.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::payment::{CheckoutRequest, CheckoutResponse};
use crate::api::middleware::auth::AuthedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Starts a checkout session for a paid plan.
///
/// # Endpoint
///
/// `POST /api/payment/checkout` (Bearer auth)
///
/// # Request Body
///
/// ```json
/// { "plan": "premium" }
/// ```
///
/// # Errors
///
/// Returns 400 when the plan is unknown, inactive, or free.
pub async fn checkout_handler(
    State(state): State<AppState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    payload.validate()?;

    let checkout_url = state
        .billing_service
        .create_checkout(user_id, &payload.plan)
        .await?;

    Ok(Json(CheckoutResponse { checkout_url }))
}

/// Receives signed events from the payment provider.
///
/// # Endpoint
///
/// `POST /api/payment/webhook`
///
/// The raw body is verified against the `Stripe-Signature` header before any
/// parsing; plan upgrades are applied only from verified
/// `checkout.session.completed` events. All other verified events are
/// acknowledged with 200 and ignored.
///
/// # Errors
///
/// Returns 400 on a missing or invalid signature.
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, AppError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::bad_request(
                "Missing Stripe-Signature header",
                json!({}),
            )
        })?;

    state.billing_service.handle_webhook(&body, signature).await?;

    Ok(StatusCode::OK)
}
