//! Link creation, redirect resolution, listing, and deletion.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::domain::entities::{FREE_PLAN, Link, NewLink, Plan};
use crate::domain::expiry;
use crate::domain::repositories::{LinkRepository, PlanRepository, UserRepository};
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_alias};
use crate::utils::target_url::validate_target_url;

/// Identity of the caller creating or managing links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// Signed-in user, identified by the auth collaborator's user id.
    User(i64),
    /// Anonymous client, identified by a request fingerprint.
    Anonymous(String),
}

impl Caller {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Caller::User(id) => Some(*id),
            Caller::Anonymous(_) => None,
        }
    }

    pub fn fingerprint(&self) -> Option<&str> {
        match self {
            Caller::User(_) => None,
            Caller::Anonymous(fp) => Some(fp),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Caller::Anonymous(_))
    }
}

/// How many anonymous links the fingerprint-scoped listing returns.
const ANONYMOUS_LIST_LIMIT: i64 = 10;

/// Service for creating and resolving shortened links.
///
/// Owns short-code allocation (collision retry), plan-driven expiry
/// assignment, and the redirect path's click accounting.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    plan_repository: Arc<dyn PlanRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl LinkService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        plan_repository: Arc<dyn PlanRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            link_repository,
            plan_repository,
            user_repository,
        }
    }

    /// Creates a short link for the given caller.
    ///
    /// # Short code allocation
    ///
    /// - With `custom_alias`: signed-in callers only (401), alias must match
    ///   `[a-zA-Z0-9-_]+` (400), must not already be assigned (409), and the
    ///   caller's plan must allow custom aliases (403).
    /// - Without: a random 8-character code, regenerated until it does not
    ///   collide. The retry is unbounded; the 2^48 code space keeps the
    ///   expected number of attempts at one.
    ///
    /// # Expiry
    ///
    /// Anonymous links expire exactly 24h after creation. Authenticated links
    /// follow the caller's active plan (`link_expiry_days`, null = permanent),
    /// falling back to the `free` plan when the caller's plan record is
    /// missing or inactive.
    pub async fn create_link(
        &self,
        original_url: String,
        custom_alias: Option<String>,
        caller: Caller,
    ) -> Result<Link, AppError> {
        validate_target_url(&original_url)?;

        let short_code = match &custom_alias {
            Some(alias) => {
                if caller.is_anonymous() {
                    return Err(AppError::unauthorized(
                        "Custom aliases are only available for signed-in users",
                        json!({}),
                    ));
                }

                validate_custom_alias(alias)?;

                if self.link_repository.find_by_code(alias).await?.is_some() {
                    return Err(AppError::conflict(
                        "Alias already taken",
                        json!({ "alias": alias }),
                    ));
                }

                alias.clone()
            }
            None => self.allocate_code().await?,
        };

        let plan = self.resolve_plan(&caller).await?;

        if custom_alias.is_some() && !plan.custom_alias_allowed {
            return Err(AppError::forbidden(
                "Custom aliases are not available in your current plan",
                json!({ "plan": plan.name }),
            ));
        }

        let now = Utc::now();
        let new_link = NewLink {
            user_id: caller.user_id(),
            fingerprint: caller.fingerprint().map(str::to_string),
            original_url,
            short_code,
            custom_alias,
            expires_at: expiry::expiry_for(&plan, caller.is_anonymous(), now),
            user_plan: plan.name.clone(),
        };

        let link = self.link_repository.create(new_link).await?;

        metrics::counter!("links_created_total").increment(1);
        tracing::info!(code = %link.short_code, anonymous = link.is_anonymous(), "Link created");

        Ok(link)
    }

    /// Resolves a short code for redirection, counting the click.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] when the code is unknown
    /// - [`AppError::Gone`] when the link has expired; the click counter is
    ///   NOT incremented in this case
    pub async fn resolve_redirect(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        if link.is_expired(Utc::now()) {
            return Err(AppError::gone(
                "Link has expired",
                json!({ "code": code, "expired_at": link.expires_at }),
            ));
        }

        self.link_repository.increment_clicks(link.id).await?;
        metrics::counter!("redirects_total").increment(1);

        Ok(link)
    }

    /// Lists a signed-in user's links, newest first.
    pub async fn list_user_links(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_user(user_id).await
    }

    /// Lists an anonymous caller's recent, unexpired links.
    ///
    /// Scoped to the fingerprint, capped at 10, and limited to the last 24h
    /// so stale fingerprint matches do not leak old links.
    pub async fn list_anonymous_links(&self, fingerprint: &str) -> Result<Vec<Link>, AppError> {
        let now = Utc::now();
        let created_after = now - Duration::hours(expiry::ANONYMOUS_LINK_LIFETIME_HOURS);

        self.link_repository
            .list_by_fingerprint(fingerprint, created_after, now, ANONYMOUS_LIST_LIMIT)
            .await
    }

    /// Deletes a link owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the link does not exist or belongs
    /// to someone else; ownership failures are indistinguishable from missing
    /// links on purpose.
    pub async fn delete_user_link(&self, id: i64, user_id: i64) -> Result<(), AppError> {
        let deleted = self.link_repository.delete_owned(id, user_id).await?;

        if !deleted {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    /// Generates a random code, retrying until it is unassigned.
    async fn allocate_code(&self) -> Result<String, AppError> {
        loop {
            let code = generate_code();

            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            tracing::debug!(code = %code, "Short code collision, regenerating");
        }
    }

    /// Resolves the caller's active plan, falling back to `free`.
    async fn resolve_plan(&self, caller: &Caller) -> Result<Plan, AppError> {
        let plan_name = match caller.user_id() {
            Some(user_id) => self
                .user_repository
                .plan_of(user_id)
                .await?
                .map(|p| p.plan)
                .unwrap_or_else(|| FREE_PLAN.to_string()),
            None => FREE_PLAN.to_string(),
        };

        if let Some(plan) = self.plan_repository.find_active_by_name(&plan_name).await? {
            return Ok(plan);
        }

        self.plan_repository
            .find_active_by_name(FREE_PLAN)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Plan catalogue is not seeded",
                    json!({ "missing": FREE_PLAN }),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserPlan;
    use crate::domain::repositories::{
        MockLinkRepository, MockPlanRepository, MockUserRepository,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn plan(name: &str, expiry_days: Option<i32>, alias_allowed: bool) -> Plan {
        Plan {
            id: 1,
            name: name.to_string(),
            display_name: name.to_string(),
            price_cents: 0,
            link_expiry_days: expiry_days,
            custom_alias_allowed: alias_allowed,
            features: vec![],
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn link_from(new_link: &NewLink) -> Link {
        Link {
            id: 10,
            user_id: new_link.user_id,
            fingerprint: new_link.fingerprint.clone(),
            original_url: new_link.original_url.clone(),
            short_code: new_link.short_code.clone(),
            custom_alias: new_link.custom_alias.clone(),
            clicks: 0,
            created_at: Utc::now(),
            expires_at: new_link.expires_at,
            user_plan: new_link.user_plan.clone(),
        }
    }

    fn service(
        link_repo: MockLinkRepository,
        plan_repo: MockPlanRepository,
        user_repo: MockUserRepository,
    ) -> LinkService {
        LinkService::new(Arc::new(link_repo), Arc::new(plan_repo), Arc::new(user_repo))
    }

    #[tokio::test]
    async fn test_anonymous_create_gets_24h_expiry_and_zero_clicks() {
        let mut link_repo = MockLinkRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let user_repo = MockUserRepository::new();

        plan_repo
            .expect_find_active_by_name()
            .withf(|name| name == "free")
            .returning(|_| Ok(Some(plan("free", Some(7), true))));

        link_repo.expect_find_by_code().returning(|_| Ok(None));
        link_repo
            .expect_create()
            .withf(|nl| {
                let expires = nl.expires_at.expect("anonymous link must expire");
                let delta = expires - Utc::now() - Duration::hours(24);
                nl.user_id.is_none()
                    && nl.fingerprint.as_deref() == Some("198.51.100.7")
                    && delta.num_seconds().abs() < 5
            })
            .times(1)
            .returning(|nl| Ok(link_from(&nl)));

        let svc = service(link_repo, plan_repo, user_repo);

        let link = svc
            .create_link(
                "https://example.com".to_string(),
                None,
                Caller::Anonymous("198.51.100.7".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(link.clicks, 0);
        assert_eq!(link.short_code.len(), 8);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let svc = service(
            MockLinkRepository::new(),
            MockPlanRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_link(
                "not-a-url".to_string(),
                None,
                Caller::Anonymous("fp".to_string()),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_alias_requires_signed_in_caller() {
        let svc = service(
            MockLinkRepository::new(),
            MockPlanRepository::new(),
            MockUserRepository::new(),
        );

        let result = svc
            .create_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                Caller::Anonymous("fp".to_string()),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_alias_conflict_is_rejected() {
        let mut link_repo = MockLinkRepository::new();
        let plan_repo = MockPlanRepository::new();
        let user_repo = MockUserRepository::new();

        link_repo
            .expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| {
                let nl = NewLink {
                    user_id: Some(7),
                    fingerprint: None,
                    original_url: "https://other.com".to_string(),
                    short_code: "promo".to_string(),
                    custom_alias: Some("promo".to_string()),
                    expires_at: None,
                    user_plan: "premium".to_string(),
                };
                Ok(Some(link_from(&nl)))
            });
        link_repo.expect_create().times(0);

        let svc = service(link_repo, plan_repo, user_repo);

        let result = svc
            .create_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                Caller::User(42),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_alias_forbidden_when_plan_disallows() {
        let mut link_repo = MockLinkRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut user_repo = MockUserRepository::new();

        link_repo.expect_find_by_code().returning(|_| Ok(None));
        link_repo.expect_create().times(0);

        user_repo.expect_plan_of().returning(|_| {
            Ok(Some(UserPlan {
                plan: "basic".to_string(),
                plan_updated_at: None,
            }))
        });
        plan_repo
            .expect_find_active_by_name()
            .withf(|name| name == "basic")
            .returning(|_| Ok(Some(plan("basic", Some(7), false))));

        let svc = service(link_repo, plan_repo, user_repo);

        let result = svc
            .create_link(
                "https://example.com".to_string(),
                Some("promo".to_string()),
                Caller::User(42),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_malformed_alias_is_rejected_before_lookup() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_find_by_code().times(0);

        let svc = service(link_repo, MockPlanRepository::new(), MockUserRepository::new());

        let result = svc
            .create_link(
                "https://example.com".to_string(),
                Some("bad alias!".to_string()),
                Caller::User(42),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_permanent_plan_creates_link_without_expiry() {
        let mut link_repo = MockLinkRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut user_repo = MockUserRepository::new();

        user_repo.expect_plan_of().returning(|_| {
            Ok(Some(UserPlan {
                plan: "premium_plus".to_string(),
                plan_updated_at: None,
            }))
        });
        plan_repo
            .expect_find_active_by_name()
            .withf(|name| name == "premium_plus")
            .returning(|_| Ok(Some(plan("premium_plus", None, true))));

        link_repo.expect_find_by_code().returning(|_| Ok(None));
        link_repo
            .expect_create()
            .withf(|nl| nl.expires_at.is_none() && nl.user_plan == "premium_plus")
            .times(1)
            .returning(|nl| Ok(link_from(&nl)));

        let svc = service(link_repo, plan_repo, user_repo);

        let link = svc
            .create_link("https://example.com".to_string(), None, Caller::User(42))
            .await
            .unwrap();

        assert!(link.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_missing_plan_record_falls_back_to_free() {
        let mut link_repo = MockLinkRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut user_repo = MockUserRepository::new();

        user_repo.expect_plan_of().returning(|_| {
            Ok(Some(UserPlan {
                plan: "retired_plan".to_string(),
                plan_updated_at: None,
            }))
        });

        plan_repo
            .expect_find_active_by_name()
            .withf(|name| name == "retired_plan")
            .times(1)
            .returning(|_| Ok(None));
        plan_repo
            .expect_find_active_by_name()
            .withf(|name| name == "free")
            .times(1)
            .returning(|_| Ok(Some(plan("free", Some(7), true))));

        link_repo.expect_find_by_code().returning(|_| Ok(None));
        link_repo
            .expect_create()
            .withf(|nl| nl.user_plan == "free" && nl.expires_at.is_some())
            .times(1)
            .returning(|nl| Ok(link_from(&nl)));

        let svc = service(link_repo, plan_repo, user_repo);

        let result = svc
            .create_link("https://example.com".to_string(), None, Caller::User(42))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_code_collision_triggers_regeneration() {
        let mut link_repo = MockLinkRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let user_repo = MockUserRepository::new();

        plan_repo
            .expect_find_active_by_name()
            .returning(|_| Ok(Some(plan("free", Some(7), true))));

        let calls = AtomicUsize::new(0);
        link_repo.expect_find_by_code().returning(move |_| {
            // First generated code collides, second is free.
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                let nl = NewLink {
                    user_id: None,
                    fingerprint: None,
                    original_url: "https://taken.com".to_string(),
                    short_code: "collided".to_string(),
                    custom_alias: None,
                    expires_at: None,
                    user_plan: "free".to_string(),
                };
                Ok(Some(link_from(&nl)))
            } else {
                Ok(None)
            }
        });
        link_repo
            .expect_create()
            .times(1)
            .returning(|nl| Ok(link_from(&nl)));

        let svc = service(link_repo, plan_repo, user_repo);

        let result = svc
            .create_link(
                "https://example.com".to_string(),
                None,
                Caller::Anonymous("fp".to_string()),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_redirect_increments_clicks_and_returns_url() {
        let mut link_repo = MockLinkRepository::new();

        link_repo.expect_find_by_code().returning(|code| {
            let nl = NewLink {
                user_id: None,
                fingerprint: None,
                original_url: "https://example.com/landing".to_string(),
                short_code: code.to_string(),
                custom_alias: None,
                expires_at: None,
                user_plan: "free".to_string(),
            };
            Ok(Some(link_from(&nl)))
        });
        link_repo
            .expect_increment_clicks()
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(link_repo, MockPlanRepository::new(), MockUserRepository::new());

        let link = svc.resolve_redirect("Ab3xYz9Q").await.unwrap();
        assert_eq!(link.original_url, "https://example.com/landing");
    }

    #[tokio::test]
    async fn test_redirect_expired_is_gone_and_does_not_count() {
        let mut link_repo = MockLinkRepository::new();

        link_repo.expect_find_by_code().returning(|code| {
            let nl = NewLink {
                user_id: None,
                fingerprint: None,
                original_url: "https://example.com".to_string(),
                short_code: code.to_string(),
                custom_alias: None,
                expires_at: Some(Utc::now() - Duration::hours(1)),
                user_plan: "free".to_string(),
            };
            Ok(Some(link_from(&nl)))
        });
        link_repo.expect_increment_clicks().times(0);

        let svc = service(link_repo, MockPlanRepository::new(), MockUserRepository::new());

        let result = svc.resolve_redirect("Ab3xYz9Q").await;
        assert!(matches!(result.unwrap_err(), AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_redirect_unknown_code_is_not_found() {
        let mut link_repo = MockLinkRepository::new();
        link_repo.expect_find_by_code().returning(|_| Ok(None));
        link_repo.expect_increment_clicks().times(0);

        let svc = service(link_repo, MockPlanRepository::new(), MockUserRepository::new());

        let result = svc.resolve_redirect("missing1").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_link() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_delete_owned()
            .withf(|id, user_id| *id == 5 && *user_id == 42)
            .returning(|_, _| Ok(false));

        let svc = service(link_repo, MockPlanRepository::new(), MockUserRepository::new());

        let result = svc.delete_user_link(5, 42).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
