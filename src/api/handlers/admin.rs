//! Handlers for the admin surface: login, stats, link moderation.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::admin::{
    AdminLinkListResponse, AdminLinkResponse, AdminLoginRequest, AdminLoginResponse,
    AdminStatsResponse, AdminUpdateLinkRequest,
};
use crate::api::dto::link::LinkResponse;
use crate::domain::entities::LinkPatch;
use crate::error::AppError;
use crate::state::AppState;

/// Operator login.
///
/// # Endpoint
///
/// `POST /api/admin/login` (public, strictly rate limited)
///
/// Returns a signed, expiring admin token on success.
pub async fn admin_login_handler(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    payload.validate()?;

    let token = state
        .admin_service
        .login(&payload.email, &payload.password)?;

    Ok(Json(AdminLoginResponse { token }))
}

/// Aggregate service statistics.
///
/// # Endpoint
///
/// `GET /api/admin/stats` (admin token)
pub async fn admin_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<AdminStatsResponse>, AppError> {
    let stats = state.admin_service.stats().await?;

    Ok(Json(AdminStatsResponse::from_stats(stats, &state.base_url)))
}

/// Lists every link with owner annotations.
///
/// # Endpoint
///
/// `GET /api/admin/links` (admin token)
pub async fn admin_links_handler(
    State(state): State<AppState>,
) -> Result<Json<AdminLinkListResponse>, AppError> {
    let links = state.admin_service.list_links().await?;

    let links: Vec<AdminLinkResponse> = links
        .into_iter()
        .map(|l| AdminLinkResponse::from_admin_link(l, &state.base_url))
        .collect();

    Ok(Json(AdminLinkListResponse {
        total: links.len(),
        links,
    }))
}

/// Edits a link's target URL or short code.
///
/// # Endpoint
///
/// `PUT /api/admin/links/{id}` (admin token)
///
/// # Errors
///
/// - 404 when the link does not exist
/// - 409 when the new short code belongs to another link
pub async fn admin_update_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let patch = LinkPatch {
        original_url: payload.original_url,
        short_code: payload.short_code,
    };

    let link = state.admin_service.update_link(id, patch).await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// Hard-deletes any link.
///
/// # Endpoint
///
/// `DELETE /api/admin/links/{id}` (admin token)
pub async fn admin_delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.admin_service.delete_link(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
