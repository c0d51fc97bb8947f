//! Shared fixtures for handler tests: mock-backed state construction.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;

use crate::application::services::{
    AdminCredentials, AdminService, AuthService, BillingService, LinkService, PlanService,
};
use crate::domain::entities::{Link, Plan};
use crate::domain::repositories::{
    LinkRepository, MockLinkRepository, MockPlanRepository, MockSessionRepository,
    MockUserRepository, PlanRepository, SessionRepository, UserRepository,
};
use crate::infrastructure::payment::{MockPaymentGateway, PaymentGateway};
use crate::state::AppState;

pub const BASE_URL: &str = "http://sl.test";
pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const ADMIN_EMAIL: &str = "admin@sl.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Mock repositories and gateway that can be wired into a full [`AppState`].
///
/// Tests set expectations on the mocks they care about and leave the rest
/// untouched; an unexpected call then fails the test.
pub struct TestState {
    pub link_repo: MockLinkRepository,
    pub plan_repo: MockPlanRepository,
    pub user_repo: MockUserRepository,
    pub session_repo: MockSessionRepository,
    pub gateway: MockPaymentGateway,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            link_repo: MockLinkRepository::new(),
            plan_repo: MockPlanRepository::new(),
            user_repo: MockUserRepository::new(),
            session_repo: MockSessionRepository::new(),
            gateway: MockPaymentGateway::new(),
        }
    }

    pub fn build(self) -> AppState {
        let link_repo: Arc<dyn LinkRepository> = Arc::new(self.link_repo);
        let plan_repo: Arc<dyn PlanRepository> = Arc::new(self.plan_repo);
        let user_repo: Arc<dyn UserRepository> = Arc::new(self.user_repo);
        let session_repo: Arc<dyn SessionRepository> = Arc::new(self.session_repo);
        let gateway: Arc<dyn PaymentGateway> = Arc::new(self.gateway);

        let link_service = Arc::new(LinkService::new(
            link_repo.clone(),
            plan_repo.clone(),
            user_repo.clone(),
        ));
        let plan_service = Arc::new(PlanService::new(plan_repo.clone(), user_repo.clone()));
        let auth_service = Arc::new(AuthService::new(session_repo, SIGNING_SECRET.to_string()));
        let admin_service = Arc::new(AdminService::new(
            link_repo.clone(),
            user_repo.clone(),
            AdminCredentials {
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
            SIGNING_SECRET.to_string(),
            24,
        ));
        let billing_service = Arc::new(BillingService::new(
            gateway, plan_repo, user_repo, link_repo,
        ));

        AppState::new(
            link_service,
            plan_service,
            auth_service,
            admin_service,
            billing_service,
            BASE_URL.to_string(),
        )
    }
}

/// A session repository that accepts any token as user 42.
pub fn permissive_sessions() -> MockSessionRepository {
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_find_user_by_token_hash()
        .returning(|_| Ok(Some(42)));
    sessions.expect_touch_last_used().returning(|_| Ok(()));
    sessions
}

pub fn sample_plan(name: &str, price_cents: i64, expiry_days: Option<i32>) -> Plan {
    Plan {
        id: 1,
        name: name.to_string(),
        display_name: name.to_string(),
        price_cents,
        link_expiry_days: expiry_days,
        custom_alias_allowed: true,
        features: vec!["Click tracking".to_string()],
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn sample_link(id: i64, user_id: Option<i64>, code: &str) -> Link {
    Link {
        id,
        user_id,
        fingerprint: user_id.is_none().then(|| "fp".to_string()),
        original_url: "https://example.com/landing".to_string(),
        short_code: code.to_string(),
        custom_alias: None,
        clicks: 0,
        created_at: Utc::now(),
        expires_at: None,
        user_plan: "free".to_string(),
    }
}
