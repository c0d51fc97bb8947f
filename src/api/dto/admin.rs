//! DTOs for the admin surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::application::services::{AdminLink, AdminStats};
use crate::domain::entities::UserSummary;

/// Operator login request.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Response carrying the signed, expiring admin token.
#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
}

/// A user as listed in admin views.
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub plan: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserSummary> for AdminUserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            plan: user.plan,
            created_at: user.created_at,
        }
    }
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub premium_users: i64,
    pub free_users: i64,
    pub total_links: i64,
    pub user_links: i64,
    pub anonymous_links: i64,
    pub total_clicks: i64,
    pub anonymous_fingerprints: i64,
    pub recent_users: Vec<AdminUserResponse>,
    pub top_links: Vec<LinkResponse>,
}

impl AdminStatsResponse {
    pub fn from_stats(stats: AdminStats, base_url: &str) -> Self {
        Self {
            total_users: stats.total_users,
            premium_users: stats.premium_users,
            free_users: stats.total_users - stats.premium_users,
            total_links: stats.total_links,
            user_links: stats.user_links,
            anonymous_links: stats.anonymous_links,
            total_clicks: stats.total_clicks,
            anonymous_fingerprints: stats.anonymous_fingerprints,
            recent_users: stats.recent_users.into_iter().map(Into::into).collect(),
            top_links: stats
                .top_links
                .into_iter()
                .map(|l| LinkResponse::from_link(l, base_url))
                .collect(),
        }
    }
}

/// A link annotated with its owner, for the admin listing.
#[derive(Debug, Serialize)]
pub struct AdminLinkResponse {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub owner: Option<AdminUserResponse>,
}

impl AdminLinkResponse {
    pub fn from_admin_link(admin_link: AdminLink, base_url: &str) -> Self {
        Self {
            link: LinkResponse::from_link(admin_link.link, base_url),
            owner: admin_link.owner.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminLinkListResponse {
    pub links: Vec<AdminLinkResponse>,
    pub total: usize,
}

/// Admin edit of a link; omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub short_code: Option<String>,
}
