//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Increments the link's click counter, then issues a 307 Temporary Redirect
/// so the short URL never gets baked into browser caches as permanent.
///
/// # Errors
///
/// - 404 when the code is unknown
/// - 410 when the link has expired (clicks are not counted)
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let link = state.link_service.resolve_redirect(&code).await?;

    Ok(Redirect::temporary(&link.original_url))
}
