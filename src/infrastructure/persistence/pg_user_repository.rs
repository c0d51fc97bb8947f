//! PostgreSQL implementation of the user repository.
//!
//! The users table belongs to the auth collaborator; queries here are limited
//! to plan columns and admin projections.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{FREE_PLAN, UserPlan, UserSummary};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    id: i64,
    email: String,
    name: Option<String>,
    plan: String,
    created_at: DateTime<Utc>,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(r: UserSummaryRow) -> Self {
        UserSummary {
            id: r.id,
            email: r.email,
            name: r.name,
            plan: r.plan,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for user plan lookups and projections.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn plan_of(&self, user_id: i64) -> Result<Option<UserPlan>, AppError> {
        let row: Option<(String, Option<DateTime<Utc>>)> =
            sqlx::query_as("SELECT plan, plan_updated_at FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(|(plan, plan_updated_at)| UserPlan {
            plan,
            plan_updated_at,
        }))
    }

    async fn set_plan(
        &self,
        user_id: i64,
        plan: &str,
        provider_session_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET plan = $2, plan_updated_at = NOW(), stripe_session_id = $3 \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(plan)
        .bind(provider_session_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_on_paid_plans(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE plan <> $1")
            .bind(FREE_PLAN)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<UserSummary>, AppError> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            "SELECT id, email, name, plan, created_at FROM users \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn summaries_by_ids(&self, ids: Vec<i64>) -> Result<Vec<UserSummary>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UserSummaryRow>(
            "SELECT id, email, name, plan, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
