//! Checkout creation and payment webhook handling.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::expiry;
use crate::domain::repositories::{LinkRepository, PlanRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::payment::{CheckoutCompleted, PaymentGateway};

/// Service driving plan upgrades through the payment provider.
///
/// Upgrades are applied only from verified webhook events, never from the
/// client-side success redirect.
pub struct BillingService {
    gateway: Arc<dyn PaymentGateway>,
    plan_repository: Arc<dyn PlanRepository>,
    user_repository: Arc<dyn UserRepository>,
    link_repository: Arc<dyn LinkRepository>,
}

impl BillingService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        plan_repository: Arc<dyn PlanRepository>,
        user_repository: Arc<dyn UserRepository>,
        link_repository: Arc<dyn LinkRepository>,
    ) -> Self {
        Self {
            gateway,
            plan_repository,
            user_repository,
            link_repository,
        }
    }

    /// Starts a checkout session for a paid plan.
    ///
    /// Returns the provider-hosted checkout URL the client should follow.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the plan is unknown, inactive,
    /// or not purchasable (the free plan is not bought, it is the default).
    pub async fn create_checkout(&self, user_id: i64, plan_name: &str) -> Result<String, AppError> {
        let plan = self
            .plan_repository
            .find_active_by_name(plan_name)
            .await?
            .filter(|p| p.is_paid())
            .ok_or_else(|| {
                AppError::bad_request("Invalid plan", json!({ "plan": plan_name }))
            })?;

        let checkout_url = self.gateway.create_checkout(user_id, &plan).await?;

        tracing::info!(user_id, plan = %plan.name, "Checkout session created");
        Ok(checkout_url)
    }

    /// Processes a raw webhook payload from the payment provider.
    ///
    /// Signature verification happens inside the gateway; events other than a
    /// completed checkout are acknowledged and ignored.
    pub async fn handle_webhook(&self, payload: &str, signature: &str) -> Result<(), AppError> {
        let Some(completed) = self.gateway.parse_webhook(payload, signature)? else {
            return Ok(());
        };

        self.apply_upgrade(completed).await
    }

    /// Applies a completed checkout: records the user's new plan and rewrites
    /// the expiry of every link they own.
    ///
    /// The rewrite restarts the expiry clock from now under the new plan, for
    /// existing links as well as future ones.
    async fn apply_upgrade(&self, completed: CheckoutCompleted) -> Result<(), AppError> {
        let plan = self
            .plan_repository
            .find_active_by_name(&completed.plan)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(
                    "Unknown plan in checkout metadata",
                    json!({ "plan": completed.plan }),
                )
            })?;

        let updated = self
            .user_repository
            .set_plan(
                completed.user_id,
                &plan.name,
                &completed.provider_session_id,
            )
            .await?;

        if !updated {
            tracing::warn!(
                user_id = completed.user_id,
                "Checkout completed for unknown user"
            );
        }

        let new_expiry = expiry::expiry_after_upgrade(&plan, Utc::now());
        let rewritten = self
            .link_repository
            .reassign_plan(completed.user_id, &plan.name, new_expiry)
            .await?;

        metrics::counter!("plan_upgrades_total").increment(1);
        tracing::info!(
            user_id = completed.user_id,
            plan = %plan.name,
            links = rewritten,
            "Plan upgrade applied"
        );

        Ok(())
    }
}
