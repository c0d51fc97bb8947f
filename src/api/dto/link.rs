//! DTOs for link creation and listing endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The target URL (must be absolute HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional custom alias. Signed-in callers only; character and length
    /// rules are enforced by the link service.
    #[validate(length(min = 1, max = 64))]
    pub custom_alias: Option<String>,
}

/// A link as rendered in API responses.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    /// Fully qualified short URL under the service's public origin.
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user_plan: String,
}

impl LinkResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: format!("{}/{}", base_url, link.short_code),
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            custom_alias: link.custom_alias,
            clicks: link.clicks,
            created_at: link.created_at,
            expires_at: link.expires_at,
            user_plan: link.user_plan,
        }
    }
}

/// Response wrapper for link listings.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
    pub total: usize,
}

impl LinkListResponse {
    pub fn from_links(links: Vec<Link>, base_url: &str) -> Self {
        let links: Vec<LinkResponse> = links
            .into_iter()
            .map(|l| LinkResponse::from_link(l, base_url))
            .collect();

        Self {
            total: links.len(),
            links,
        }
    }
}
