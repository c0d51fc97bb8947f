//! Repository trait for bearer session tokens.

use async_trait::async_trait;

use crate::error::AppError;

/// Repository interface for session token lookups.
///
/// Tokens are stored as HMAC-SHA256 hashes; the raw token never touches the
/// database. See [`crate::application::services::AuthService`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Resolves a token hash to the owning user id.
    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<i64>, AppError>;

    /// Records when a token was last used, for monitoring and audit.
    async fn touch_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Stores a new session token hash for a user (admin CLI).
    async fn create(&self, user_id: i64, token_hash: &str) -> Result<(), AppError>;
}
