//! Payment provider integration.
//!
//! The provider is an external collaborator: this service only creates hosted
//! checkout sessions and consumes signed webhook events. The gateway trait is
//! the seam that keeps billing logic testable without network access.

pub mod stripe_gateway;

use async_trait::async_trait;

use crate::domain::entities::Plan;
use crate::error::AppError;

/// Payload of a completed checkout, extracted from a verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCompleted {
    pub user_id: i64,
    pub plan: String,
    pub provider_session_id: String,
}

/// External payment provider contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted checkout session for upgrading `user_id` to `plan`
    /// and returns the URL the client should be sent to.
    async fn create_checkout(&self, user_id: i64, plan: &Plan) -> Result<String, AppError>;

    /// Verifies a webhook payload against its signature header and extracts
    /// a completed checkout, if that is what the event describes.
    ///
    /// Returns `Ok(None)` for valid events of types this service ignores.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the signature is invalid or the
    /// payload is malformed.
    fn parse_webhook(
        &self,
        payload: &str,
        signature: &str,
    ) -> Result<Option<CheckoutCompleted>, AppError>;
}

pub use stripe_gateway::StripeGateway;
