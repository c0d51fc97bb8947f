//! Stripe implementation of the payment gateway.

use async_trait::async_trait;
use serde_json::json;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency, EventObject, EventType, Webhook,
};

use super::{CheckoutCompleted, PaymentGateway};
use crate::domain::entities::Plan;
use crate::error::AppError;

/// Stripe-specific settings, a slice of the application [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct StripeSettings {
    pub secret_key: String,
    pub webhook_secret: String,
    /// Base URL used to build checkout success/cancel redirect targets.
    pub base_url: String,
    /// When true, checkout returns a mock URL and webhooks skip signature
    /// verification. Never enable outside local development.
    pub development_mode: bool,
}

/// Payment gateway backed by Stripe Checkout.
pub struct StripeGateway {
    client: Client,
    settings: StripeSettings,
}

impl StripeGateway {
    pub fn new(settings: StripeSettings) -> Self {
        Self {
            client: Client::new(settings.secret_key.clone()),
            settings,
        }
    }

    fn extract_completed(session: CheckoutSession) -> Result<CheckoutCompleted, AppError> {
        let metadata = session.metadata.as_ref();

        let user_id = metadata
            .and_then(|m| m.get("user_id"))
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| {
                AppError::bad_request(
                    "Invalid or missing user_id in checkout session metadata",
                    json!({}),
                )
            })?;

        let plan = metadata
            .and_then(|m| m.get("plan"))
            .cloned()
            .ok_or_else(|| {
                AppError::bad_request("Missing plan in checkout session metadata", json!({}))
            })?;

        Ok(CheckoutCompleted {
            user_id,
            plan,
            provider_session_id: session.id.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout(&self, user_id: i64, plan: &Plan) -> Result<String, AppError> {
        if self.settings.development_mode {
            tracing::info!("Payment development mode: returning mock checkout URL");
            return Ok(format!(
                "{}/mock-checkout?user_id={}&plan={}",
                self.settings.base_url.trim_end_matches('/'),
                user_id,
                plan.name
            ));
        }

        let base = self.settings.base_url.trim_end_matches('/');
        let success_url = format!(
            "{base}/dashboard?payment=success&plan={}&session_id={{CHECKOUT_SESSION_ID}}",
            plan.name
        );
        let cancel_url = format!("{base}/dashboard?payment=cancelled");

        let params = CreateCheckoutSession {
            success_url: Some(&success_url),
            cancel_url: Some(&cancel_url),
            mode: Some(CheckoutSessionMode::Payment),
            line_items: Some(vec![CreateCheckoutSessionLineItems {
                price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                    currency: Currency::USD,
                    product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                        name: plan.display_name.clone(),
                        ..Default::default()
                    }),
                    unit_amount: Some(plan.price_cents),
                    ..Default::default()
                }),
                quantity: Some(1),
                ..Default::default()
            }]),
            metadata: Some(
                [
                    ("user_id".to_string(), user_id.to_string()),
                    ("plan".to_string(), plan.name.clone()),
                ]
                .into_iter()
                .collect(),
            ),
            ..Default::default()
        };

        let session = CheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create checkout session");
                AppError::internal("Payment provider error", json!({}))
            })?;

        session.url.ok_or_else(|| {
            AppError::internal("No checkout URL returned by payment provider", json!({}))
        })
    }

    fn parse_webhook(
        &self,
        payload: &str,
        signature: &str,
    ) -> Result<Option<CheckoutCompleted>, AppError> {
        let event = if self.settings.development_mode {
            tracing::info!("Payment development mode: skipping webhook signature verification");
            serde_json::from_str::<stripe::Event>(payload).map_err(|e| {
                AppError::bad_request(
                    "Invalid webhook payload",
                    json!({ "reason": e.to_string() }),
                )
            })?
        } else {
            Webhook::construct_event(payload, signature, &self.settings.webhook_secret).map_err(
                |e| {
                    tracing::warn!(error = %e, "Webhook signature verification failed");
                    AppError::bad_request("Invalid signature", json!({}))
                },
            )?
        };

        match event.type_ {
            EventType::CheckoutSessionCompleted => {
                if let EventObject::CheckoutSession(session) = event.data.object {
                    Ok(Some(Self::extract_completed(session)?))
                } else {
                    Err(AppError::bad_request(
                        "Unexpected object for checkout.session.completed",
                        json!({}),
                    ))
                }
            }
            other => {
                tracing::debug!(event_type = ?other, "Ignoring webhook event type");
                Ok(None)
            }
        }
    }
}
