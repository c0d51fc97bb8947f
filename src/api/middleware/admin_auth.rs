//! Admin token verification middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Verifies the signed admin token on every admin endpoint except login.
///
/// The token is stateless (`{expiry}.{signature}`), so verification needs no
/// database access.
///
/// # Errors
///
/// Returns `401 Unauthorized` on a missing header, a bad signature, or an
/// expired token.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    st.admin_service.verify_token(&token)?;

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}
