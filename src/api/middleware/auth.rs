//! Bearer token authentication middleware and caller extraction.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::Caller;
use crate::utils::fingerprint::fingerprint_from_headers;
use crate::{error::AppError, state::AppState};

/// The authenticated user id, inserted into request extensions by [`layer`].
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub i64);

/// Authenticates requests using Bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the resolved [`AuthedUser`] is inserted into request extensions
/// for handlers to consume.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token is not found in the session store
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

    let user_id = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(AuthedUser(user_id));

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

/// Extractor resolving the caller identity for optionally-authenticated
/// endpoints.
///
/// With an Authorization header present the bearer token MUST be valid; a bad
/// token is rejected rather than silently downgraded to anonymous. Without
/// one, the caller is anonymous and identified by a request fingerprint.
pub struct CallerIdentity(pub Caller);

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            let fingerprint = fingerprint_from_headers(&parts.headers);
            return Ok(CallerIdentity(Caller::Anonymous(fingerprint)));
        }

        let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
            .await
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Authorization header is malformed"}),
                )
            })?;

        let user_id = state.auth_service.authenticate(&token).await?;

        Ok(CallerIdentity(Caller::User(user_id)))
    }
}
