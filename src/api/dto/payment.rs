//! DTOs for checkout creation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to start a checkout session for a paid plan.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Plan name from the catalogue, e.g. `premium`.
    #[validate(length(min = 1, max = 64))]
    pub plan: String,
}

/// Response carrying the provider-hosted checkout URL.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
}
