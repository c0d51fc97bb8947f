//! PostgreSQL implementation of the plan repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewPlan, Plan};
use crate::domain::repositories::PlanRepository;
use crate::error::AppError;

const PLAN_COLUMNS: &str = "id, name, display_name, price_cents, link_expiry_days, \
                            custom_alias_allowed, features, is_active, created_at";

#[derive(sqlx::FromRow)]
struct PlanRow {
    id: i64,
    name: String,
    display_name: String,
    price_cents: i64,
    link_expiry_days: Option<i32>,
    custom_alias_allowed: bool,
    features: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<PlanRow> for Plan {
    fn from(r: PlanRow) -> Self {
        Plan {
            id: r.id,
            name: r.name,
            display_name: r.display_name,
            price_cents: r.price_cents,
            link_expiry_days: r.link_expiry_days,
            custom_alias_allowed: r.custom_alias_allowed,
            features: r.features,
            is_active: r.is_active,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for the plan catalogue.
pub struct PgPlanRepository {
    pool: Arc<PgPool>,
}

impl PgPlanRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Plan>, AppError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE name = $1 AND is_active = TRUE"
        ))
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_active(&self) -> Result<Vec<Plan>, AppError> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE is_active = TRUE ORDER BY price_cents ASC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plans")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn create(&self, new_plan: NewPlan) -> Result<Plan, AppError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "INSERT INTO plans (name, display_name, price_cents, link_expiry_days, custom_alias_allowed, features) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(&new_plan.name)
        .bind(&new_plan.display_name)
        .bind(new_plan.price_cents)
        .bind(new_plan.link_expiry_days)
        .bind(new_plan.custom_alias_allowed)
        .bind(&new_plan.features)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
