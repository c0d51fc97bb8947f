//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with ownership, click count, and expiry metadata.
///
/// `user_id` is `None` for anonymously created links, in which case
/// `fingerprint` scopes visibility to the creating client.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub user_id: Option<i64>,
    pub fingerprint: Option<String>,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user_plan: String,
}

impl Link {
    /// Returns true if the link has passed its expiry time.
    ///
    /// `expires_at = None` means the link never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }

    /// Returns true if the link was created without a signed-in user.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Input data for creating a new link.
///
/// `clicks` is always zero-initialized on insert and `created_at` is assigned
/// by the database.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub user_id: Option<i64>,
    pub fingerprint: Option<String>,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user_plan: String,
}

/// Partial update applied by the admin links endpoint.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub short_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_link(expires_at: Option<DateTime<Utc>>) -> Link {
        Link {
            id: 1,
            user_id: None,
            fingerprint: Some("198.51.100.7".to_string()),
            original_url: "https://example.com".to_string(),
            short_code: "Ab3xYz9Q".to_string(),
            custom_alias: None,
            clicks: 0,
            created_at: Utc::now(),
            expires_at,
            user_plan: "free".to_string(),
        }
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let link = sample_link(None);
        assert!(!link.is_expired(Utc::now() + Duration::days(10_000)));
    }

    #[test]
    fn test_link_expired_in_past() {
        let now = Utc::now();
        let link = sample_link(Some(now - Duration::hours(1)));
        assert!(link.is_expired(now));
    }

    #[test]
    fn test_link_not_expired_before_deadline() {
        let now = Utc::now();
        let link = sample_link(Some(now + Duration::hours(1)));
        assert!(!link.is_expired(now));
    }

    #[test]
    fn test_anonymous_detection() {
        let mut link = sample_link(None);
        assert!(link.is_anonymous());

        link.user_id = Some(42);
        assert!(!link.is_anonymous());
    }
}
