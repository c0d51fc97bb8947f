//! Admin surface: operator login, aggregate stats, link moderation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::domain::entities::{Link, LinkPatch, UserSummary};
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;
use crate::utils::code_generator::validate_custom_alias;
use crate::utils::target_url::validate_target_url;

type HmacSha256 = Hmac<Sha256>;

/// How many recent users and top links the stats view carries.
const STATS_SAMPLE_SIZE: i64 = 10;

/// Operator credentials, loaded from the environment.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminStats {
    pub total_users: i64,
    pub premium_users: i64,
    pub total_links: i64,
    pub user_links: i64,
    pub anonymous_links: i64,
    pub total_clicks: i64,
    pub anonymous_fingerprints: i64,
    pub recent_users: Vec<UserSummary>,
    pub top_links: Vec<Link>,
}

/// A link annotated with its owner, for the admin listing.
#[derive(Debug, Clone)]
pub struct AdminLink {
    pub link: Link,
    pub owner: Option<UserSummary>,
}

/// Service behind the admin endpoints.
///
/// Login checks env-configured credentials and mints a signed, expiring
/// bearer token. The token is stateless: `{expiry_unix}.{hmac_hex}` signed
/// with the server secret, so no session row is needed and restarts do not
/// log operators out.
pub struct AdminService {
    link_repository: Arc<dyn LinkRepository>,
    user_repository: Arc<dyn UserRepository>,
    credentials: AdminCredentials,
    signing_secret: String,
    token_ttl: Duration,
}

impl AdminService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        user_repository: Arc<dyn UserRepository>,
        credentials: AdminCredentials,
        signing_secret: String,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            link_repository,
            user_repository,
            credentials,
            signing_secret,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    fn sign(&self, expires_unix: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(format!("admin:{expires_unix}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Validates operator credentials and mints an admin token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on a credential mismatch. The error
    /// does not say which field was wrong.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        if email != self.credentials.email || password != self.credentials.password {
            return Err(AppError::unauthorized(
                "Invalid credentials",
                json!({}),
            ));
        }

        let expires_unix = (Utc::now() + self.token_ttl).timestamp();
        let token = format!("{expires_unix}.{}", self.sign(expires_unix));

        tracing::info!("Admin login succeeded");
        Ok(token)
    }

    /// Verifies an admin token's signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<(), AppError> {
        let invalid = || AppError::unauthorized("Invalid admin token", json!({}));

        let (expires_part, signature) = token.split_once('.').ok_or_else(invalid)?;
        let expires_unix: i64 = expires_part.parse().map_err(|_| invalid())?;

        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(format!("admin:{expires_unix}").as_bytes());

        let signature_bytes = hex::decode(signature).map_err(|_| invalid())?;
        mac.verify_slice(&signature_bytes).map_err(|_| invalid())?;

        if expires_unix < Utc::now().timestamp() {
            return Err(AppError::unauthorized(
                "Admin token expired",
                json!({}),
            ));
        }

        Ok(())
    }

    /// Collects the dashboard counters in one pass.
    pub async fn stats(&self) -> Result<AdminStats, AppError> {
        let total_users = self.user_repository.count().await?;
        let premium_users = self.user_repository.count_on_paid_plans().await?;
        let total_links = self.link_repository.count().await?;
        let anonymous_links = self.link_repository.count_anonymous().await?;
        let total_clicks = self.link_repository.total_clicks().await?;
        let anonymous_fingerprints = self
            .link_repository
            .count_distinct_fingerprints()
            .await?;
        let recent_users = self.user_repository.recent(STATS_SAMPLE_SIZE).await?;
        let top_links = self.link_repository.top_by_clicks(STATS_SAMPLE_SIZE).await?;

        Ok(AdminStats {
            total_users,
            premium_users,
            total_links,
            user_links: total_links - anonymous_links,
            anonymous_links,
            total_clicks,
            anonymous_fingerprints,
            recent_users,
            top_links,
        })
    }

    /// Every link in the system, annotated with owner summaries.
    pub async fn list_links(&self) -> Result<Vec<AdminLink>, AppError> {
        let links = self.link_repository.list_all().await?;

        let mut owner_ids: Vec<i64> = links.iter().filter_map(|l| l.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners = self.user_repository.summaries_by_ids(owner_ids).await?;

        Ok(links
            .into_iter()
            .map(|link| {
                let owner = link
                    .user_id
                    .and_then(|id| owners.iter().find(|u| u.id == id).cloned());
                AdminLink { link, owner }
            })
            .collect())
    }

    /// Applies an admin edit to a link.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL or short code
    /// - [`AppError::Conflict`] when the new short code belongs to another link
    /// - [`AppError::NotFound`] when the link does not exist
    pub async fn update_link(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        if let Some(url) = &patch.original_url {
            validate_target_url(url)?;
        }

        if let Some(code) = &patch.short_code {
            validate_custom_alias(code)?;

            if let Some(existing) = self.link_repository.find_by_code(code).await?
                && existing.id != id
            {
                return Err(AppError::conflict(
                    "Short code already assigned",
                    json!({ "short_code": code }),
                ));
            }
        }

        self.link_repository.update(id, patch).await
    }

    /// Hard-deletes any link, regardless of owner.
    pub async fn delete_link(&self, id: i64) -> Result<(), AppError> {
        if !self.link_repository.delete(id).await? {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockLinkRepository, MockUserRepository};

    fn credentials() -> AdminCredentials {
        AdminCredentials {
            email: "admin@example.com".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    fn service(link_repo: MockLinkRepository, user_repo: MockUserRepository) -> AdminService {
        AdminService::new(
            Arc::new(link_repo),
            Arc::new(user_repo),
            credentials(),
            "admin-signing-secret".to_string(),
            24,
        )
    }

    fn empty_service() -> AdminService {
        service(MockLinkRepository::new(), MockUserRepository::new())
    }

    fn link(id: i64, user_id: Option<i64>, code: &str, clicks: i64) -> Link {
        Link {
            id,
            user_id,
            fingerprint: user_id.is_none().then(|| "fp".to_string()),
            original_url: "https://example.com".to_string(),
            short_code: code.to_string(),
            custom_alias: None,
            clicks,
            created_at: Utc::now(),
            expires_at: None,
            user_plan: "free".to_string(),
        }
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let svc = empty_service();

        let result = svc.login("admin@example.com", "wrong");
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_login_token_verifies() {
        let svc = empty_service();

        let token = svc.login("admin@example.com", "correct-horse").unwrap();
        assert!(svc.verify_token(&token).is_ok());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let svc = empty_service();

        let token = svc.login("admin@example.com", "correct-horse").unwrap();
        let (expires, _) = token.split_once('.').unwrap();

        // Signature swapped in from a different expiry.
        let forged = format!("{}.{}", expires, svc.sign(0));
        assert!(svc.verify_token(&forged).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let svc = empty_service();

        let past = (Utc::now() - Duration::hours(1)).timestamp();
        let token = format!("{past}.{}", svc.sign(past));

        let err = svc.verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let svc = empty_service();

        assert!(svc.verify_token("not-a-token").is_err());
        assert!(svc.verify_token("123.nothex").is_err());
        assert!(svc.verify_token("").is_err());
    }

    #[tokio::test]
    async fn test_stats_derives_user_link_split() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_count().returning(|| Ok(10));
        link_repo.expect_count_anonymous().returning(|| Ok(4));
        link_repo.expect_total_clicks().returning(|| Ok(250));
        link_repo
            .expect_count_distinct_fingerprints()
            .returning(|| Ok(3));
        link_repo
            .expect_top_by_clicks()
            .returning(|_| Ok(vec![link(1, Some(7), "top", 100)]));

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_count().returning(|| Ok(6));
        user_repo.expect_count_on_paid_plans().returning(|| Ok(2));
        user_repo.expect_recent().returning(|_| Ok(vec![]));

        let svc = service(link_repo, user_repo);

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.user_links, 6);
        assert_eq!(stats.anonymous_links, 4);
        assert_eq!(stats.premium_users, 2);
    }

    #[tokio::test]
    async fn test_list_links_annotates_owners() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_list_all().returning(|| {
            Ok(vec![
                link(1, Some(7), "owned", 3),
                link(2, None, "anon", 1),
            ])
        });

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_summaries_by_ids()
            .withf(|ids| ids == [7])
            .returning(|_| {
                Ok(vec![UserSummary {
                    id: 7,
                    email: "owner@example.com".to_string(),
                    name: Some("Owner".to_string()),
                    plan: "premium".to_string(),
                    created_at: Utc::now(),
                }])
            });

        let svc = service(link_repo, user_repo);

        let listed = svc.list_links().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].owner.as_ref().unwrap().email, "owner@example.com");
        assert!(listed[1].owner.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_code_owned_by_other_link() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .withf(|code| code == "taken")
            .returning(|_| Ok(Some(link(99, None, "taken", 0))));
        link_repo.expect_update().times(0);

        let svc = service(link_repo, MockUserRepository::new());

        let patch = LinkPatch {
            original_url: None,
            short_code: Some("taken".to_string()),
        };

        let result = svc.update_link(1, patch).await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_allows_keeping_own_code() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code()
            .returning(|_| Ok(Some(link(1, None, "mine", 0))));
        link_repo
            .expect_update()
            .times(1)
            .returning(|id, _| Ok(link(id, None, "mine", 0)));

        let svc = service(link_repo, MockUserRepository::new());

        let patch = LinkPatch {
            original_url: Some("https://example.com/new".to_string()),
            short_code: Some("mine".to_string()),
        };

        assert!(svc.update_link(1, patch).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_link_is_not_found() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_delete().returning(|_| Ok(false));

        let svc = service(link_repo, MockUserRepository::new());

        let result = svc.delete_link(404).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
