//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect (public)
//! - `GET  /health`      - Health check (public)
//! - `/api/*`            - REST API (mixed public/authenticated)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer session token or admin token per route group
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let public = rate_limit::public(api::routes::public_routes(), behind_proxy);
    let protected = rate_limit::strict(
        api::routes::protected_routes(state.clone()),
        behind_proxy,
    );
    let admin = rate_limit::strict(api::routes::admin_routes(state.clone()), behind_proxy);

    let api_router = Router::new().merge(public).merge(protected).merge(admin);

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
