//! Repository trait for short link data access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link with a zero click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken
    /// (unique constraint), [`AppError::Internal`] on other database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Increments the click counter by one.
    ///
    /// A plain `UPDATE ... SET clicks = clicks + 1`; click counts are
    /// approximate analytics, not billing data.
    async fn increment_clicks(&self, id: i64) -> Result<(), AppError>;

    /// Lists a user's links, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Link>, AppError>;

    /// Lists anonymous links for a fingerprint created after `created_after`
    /// and not yet expired at `now`, newest first, capped at `limit`.
    async fn list_by_fingerprint(
        &self,
        fingerprint: &str,
        created_after: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Deletes a link only if it belongs to the given user.
    ///
    /// Returns `Ok(true)` when a row was removed.
    async fn delete_owned(&self, id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Lists every link, newest first (admin view).
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Applies an admin patch; `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError>;

    /// Hard-deletes a link by id (admin). Returns `Ok(true)` when removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Rewrites `user_plan` and `expires_at` on all of a user's links.
    ///
    /// Invoked after a paid plan upgrade. Returns the number of affected rows.
    async fn reassign_plan(
        &self,
        user_id: i64,
        plan_name: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<u64, AppError>;

    /// Total number of links.
    async fn count(&self) -> Result<i64, AppError>;

    /// Number of anonymously created links.
    async fn count_anonymous(&self) -> Result<i64, AppError>;

    /// Sum of all click counters.
    async fn total_clicks(&self) -> Result<i64, AppError>;

    /// Number of distinct anonymous fingerprints.
    async fn count_distinct_fingerprints(&self) -> Result<i64, AppError>;

    /// The `limit` most-clicked links.
    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<Link>, AppError>;
}
