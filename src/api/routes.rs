//! API route configuration.

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::api::handlers::{
    admin_delete_link_handler, admin_links_handler, admin_login_handler, admin_stats_handler,
    admin_update_link_handler, checkout_handler, create_link_handler, delete_link_handler,
    list_anonymous_links_handler, list_links_handler, plans_handler, user_plan_handler,
    webhook_handler,
};
use crate::api::middleware::{admin_auth, auth};
use crate::state::AppState;

/// Routes that need no bearer token.
///
/// # Endpoints
///
/// - `POST /links`            - Create a short link (optional auth)
/// - `GET  /links/anonymous`  - Fingerprint-scoped recent links
/// - `GET  /plans`            - Active plan catalogue
/// - `POST /payment/webhook`  - Signed provider events
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/links/anonymous", get(list_anonymous_links_handler))
        .route("/plans", get(plans_handler))
        .route("/payment/webhook", post(webhook_handler))
}

/// Routes protected by Bearer session authentication.
///
/// # Endpoints
///
/// - `GET    /links`            - List own links
/// - `DELETE /links/{id}`       - Delete an owned link
/// - `GET    /me/plan`          - Current plan assignment
/// - `POST   /payment/checkout` - Start a plan upgrade checkout
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler))
        .route("/links/{id}", delete(delete_link_handler))
        .route("/me/plan", get(user_plan_handler))
        .route("/payment/checkout", post(checkout_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// Admin routes guarded by the signed admin token; login is open.
///
/// # Endpoints
///
/// - `POST   /admin/login`       - Operator login
/// - `GET    /admin/stats`       - Aggregate statistics
/// - `GET    /admin/links`       - All links with owners
/// - `PUT    /admin/links/{id}`  - Edit a link
/// - `DELETE /admin/links/{id}`  - Hard-delete a link
pub fn admin_routes(state: AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/admin/stats", get(admin_stats_handler))
        .route("/admin/links", get(admin_links_handler))
        .route(
            "/admin/links/{id}",
            put(admin_update_link_handler).delete(admin_delete_link_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, admin_auth::layer));

    Router::new()
        .merge(guarded)
        .route("/admin/login", post(admin_login_handler))
}
