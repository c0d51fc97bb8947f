//! Handlers for link creation, listing, and deletion.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::api::middleware::auth::{AuthedUser, CallerIdentity};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::fingerprint::fingerprint_from_headers;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links` (optional Bearer auth)
///
/// Signed-in callers get plan-driven expiry and may request a custom alias;
/// anonymous callers are fingerprinted and their links expire after 24 hours.
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "custom_alias": "my-link"
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed URL or alias
/// - 401 when an anonymous caller requests an alias, or the bearer token is bad
/// - 403 when the caller's plan does not allow aliases
/// - 409 when the alias is already assigned
pub async fn create_link_handler(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.url, payload.custom_alias, caller)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, &state.base_url)),
    ))
}

/// Lists the signed-in caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links` (Bearer auth)
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_user_links(user_id).await?;

    Ok(Json(LinkListResponse::from_links(links, &state.base_url)))
}

/// Lists an anonymous caller's recent links.
///
/// # Endpoint
///
/// `GET /api/links/anonymous`
///
/// Scoped to the request fingerprint; returns at most 10 unexpired links
/// created within the last 24 hours.
pub async fn list_anonymous_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LinkListResponse>, AppError> {
    let fingerprint = fingerprint_from_headers(&headers);
    let links = state.link_service.list_anonymous_links(&fingerprint).await?;

    Ok(Json(LinkListResponse::from_links(links, &state.base_url)))
}

/// Deletes a link owned by the signed-in caller.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}` (Bearer auth)
///
/// # Errors
///
/// Returns 404 when the link does not exist or belongs to someone else.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(AuthedUser(user_id)): Extension<AuthedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_user_link(id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{self, TestState, sample_link, sample_plan};
    use axum::{
        Router, middleware,
        routing::{delete, get, post},
    };
    use axum_test::TestServer;
    use serde_json::json;

    fn create_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route("/api/links", post(create_link_handler))
            .route("/api/links/anonymous", get(list_anonymous_links_handler))
            .with_state(state);

        TestServer::new(app).unwrap()
    }

    fn protected_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route("/api/links", get(list_links_handler))
            .route("/api/links/{id}", delete(delete_link_handler))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                crate::api::middleware::auth::layer,
            ))
            .with_state(state);

        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_create_anonymous_link() {
        let mut ts = TestState::new();

        ts.plan_repo
            .expect_find_active_by_name()
            .returning(|_| Ok(Some(sample_plan("free", 0, Some(7)))));
        ts.link_repo.expect_find_by_code().returning(|_| Ok(None));
        ts.link_repo.expect_create().returning(|nl| {
            let mut link = sample_link(1, None, &nl.short_code);
            link.original_url = nl.original_url;
            link.expires_at = nl.expires_at;
            Ok(link)
        });

        let server = create_server(ts.build());

        let response = server
            .post("/api/links")
            .json(&json!({ "url": "https://example.com/page" }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["clicks"], 0);
        assert_eq!(body["original_url"], "https://example.com/page");
        assert!(body["short_url"]
            .as_str()
            .unwrap()
            .starts_with(testing::BASE_URL));
        assert!(body["expires_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let ts = TestState::new();
        let server = create_server(ts.build());

        let response = server
            .post("/api/links")
            .json(&json!({ "url": "not a url" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_alias_requires_auth() {
        let ts = TestState::new();
        let server = create_server(ts.build());

        let response = server
            .post("/api/links")
            .json(&json!({ "url": "https://example.com", "custom_alias": "promo" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_alias_conflict_returns_409() {
        let mut ts = TestState::new();
        ts.session_repo = testing::permissive_sessions();

        ts.link_repo
            .expect_find_by_code()
            .returning(|code| Ok(Some(sample_link(9, Some(7), code))));

        let server = create_server(ts.build());

        let response = server
            .post("/api/links")
            .authorization_bearer("some-token")
            .json(&json!({ "url": "https://example.com", "custom_alias": "promo" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn test_create_with_bad_token_is_rejected() {
        let mut ts = TestState::new();
        ts.session_repo
            .expect_find_user_by_token_hash()
            .returning(|_| Ok(None));

        let server = create_server(ts.build());

        let response = server
            .post("/api/links")
            .authorization_bearer("bad-token")
            .json(&json!({ "url": "https://example.com" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_links_requires_auth() {
        let ts = TestState::new();
        let server = protected_server(ts.build());

        let response = server.get("/api/links").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_links_returns_owned_links() {
        let mut ts = TestState::new();
        ts.session_repo = testing::permissive_sessions();

        ts.link_repo
            .expect_list_by_user()
            .withf(|user_id| *user_id == 42)
            .returning(|_| Ok(vec![sample_link(1, Some(42), "abc12345")]));

        let server = protected_server(ts.build());

        let response = server
            .get("/api/links")
            .authorization_bearer("some-token")
            .await;

        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["total"], 1);
        assert_eq!(body["links"][0]["short_code"], "abc12345");
    }

    #[tokio::test]
    async fn test_anonymous_listing_uses_fingerprint() {
        let mut ts = TestState::new();

        ts.link_repo
            .expect_list_by_fingerprint()
            .withf(|fp, _, _, limit| fp == "198.51.100.7" && *limit == 10)
            .returning(|_, _, _, _| Ok(vec![sample_link(1, None, "anon1234")]));

        let server = create_server(ts.build());

        let response = server
            .get("/api/links/anonymous")
            .add_header("x-forwarded-for", "198.51.100.7")
            .await;

        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_delete_foreign_link_is_404() {
        let mut ts = TestState::new();
        ts.session_repo = testing::permissive_sessions();

        ts.link_repo
            .expect_delete_owned()
            .returning(|_, _| Ok(false));

        let server = protected_server(ts.build());

        let response = server
            .delete("/api/links/5")
            .authorization_bearer("some-token")
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_own_link_is_204() {
        let mut ts = TestState::new();
        ts.session_repo = testing::permissive_sessions();

        ts.link_repo
            .expect_delete_owned()
            .withf(|id, user_id| *id == 5 && *user_id == 42)
            .returning(|_, _| Ok(true));

        let server = protected_server(ts.build());

        let response = server
            .delete("/api/links/5")
            .authorization_bearer("some-token")
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
    }
}
