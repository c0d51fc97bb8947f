//! Authentication service for API session tokens.

use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Length of freshly issued raw session tokens.
const TOKEN_LENGTH: usize = 48;

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// storage and comparison. An attacker with read-only access to the database
/// cannot verify or forge tokens without the server-side secret.
pub struct AuthService {
    repository: Arc<dyn SessionRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were issued.
    pub fn new(repository: Arc<dyn SessionRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Authenticates a raw token, returning the owning user id.
    ///
    /// On success, updates the session's `last_used` timestamp for monitoring
    /// and audit purposes. The touch is best-effort; a failed write does not
    /// fail the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when the token hash matches no
    /// stored session.
    pub async fn authenticate(&self, token: &str) -> Result<i64, AppError> {
        let token_hash = self.hash_token(token);

        let user_id = self
            .repository
            .find_user_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid or revoked token"}),
                )
            })?;

        let _ = self.repository.touch_last_used(&token_hash).await;

        Ok(user_id)
    }

    /// Issues a fresh session token for a user and stores its hash.
    ///
    /// Returns the raw token; it is shown once and never persisted.
    pub async fn issue_token(&self, user_id: i64) -> Result<String, AppError> {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        let token_hash = self.hash_token(&token);
        self.repository.create(user_id, &token_hash).await?;

        Ok(token)
    }
}
