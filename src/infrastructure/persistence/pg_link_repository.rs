//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, user_id, fingerprint, original_url, short_code, custom_alias, \
                            clicks, created_at, expires_at, user_plan";

/// Database row shape for links, mapped into the domain entity.
#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    user_id: Option<i64>,
    fingerprint: Option<String>,
    original_url: String,
    short_code: String,
    custom_alias: Option<String>,
    clicks: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    user_plan: String,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            user_id: r.user_id,
            fingerprint: r.fingerprint,
            original_url: r.original_url,
            short_code: r.short_code,
            custom_alias: r.custom_alias,
            clicks: r.clicks,
            created_at: r.created_at,
            expires_at: r.expires_at,
            user_plan: r.user_plan,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "INSERT INTO links (user_id, fingerprint, original_url, short_code, custom_alias, expires_at, user_plan) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(new_link.user_id)
        .bind(&new_link.fingerprint)
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(&new_link.custom_alias)
        .bind(new_link.expires_at)
        .bind(&new_link.user_plan)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE short_code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_fingerprint(
        &self,
        fingerprint: &str,
        created_after: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE user_id IS NULL AND fingerprint = $1 AND created_at >= $2 \
               AND (expires_at IS NULL OR expires_at > $3) \
             ORDER BY created_at DESC LIMIT $4"
        ))
        .bind(fingerprint)
        .bind(created_after)
        .bind(now)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_owned(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "UPDATE links SET \
                 original_url = COALESCE($2, original_url), \
                 short_code = COALESCE($3, short_code) \
             WHERE id = $1 \
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.original_url)
        .bind(patch.short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reassign_plan(
        &self,
        user_id: i64,
        plan_name: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE links SET user_plan = $2, expires_at = $3 WHERE user_id = $1")
            .bind(user_id)
            .bind(plan_name)
            .bind(expires_at)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_anonymous(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE user_id IS NULL")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn count_distinct_fingerprints(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT fingerprint) FROM links WHERE user_id IS NULL",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn top_by_clicks(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY clicks DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
