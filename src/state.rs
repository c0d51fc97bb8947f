//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{
    AdminService, AuthService, BillingService, LinkService, PlanService,
};

/// Application state shared across request handlers.
///
/// Services are wired once at startup from the configured repositories and
/// cloned cheaply per request.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub plan_service: Arc<PlanService>,
    pub auth_service: Arc<AuthService>,
    pub admin_service: Arc<AdminService>,
    pub billing_service: Arc<BillingService>,
    /// Public origin used to render short URLs, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        plan_service: Arc<PlanService>,
        auth_service: Arc<AuthService>,
        admin_service: Arc<AdminService>,
        billing_service: Arc<BillingService>,
        base_url: String,
    ) -> Self {
        Self {
            link_service,
            plan_service,
            auth_service,
            admin_service,
            billing_service,
            base_url,
        }
    }

    /// Renders the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
