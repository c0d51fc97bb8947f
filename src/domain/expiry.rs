//! Plan-driven link expiry rules.
//!
//! Pure functions only; plan resolution (including the free-plan fallback for
//! missing or inactive plan records) happens in the application layer.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::Plan;

/// Fixed lifetime of anonymously created links.
///
/// Anonymous expiry is hardcoded rather than read from the plan table so a
/// misconfigured catalogue can never hand out permanent links to
/// unauthenticated callers.
pub const ANONYMOUS_LINK_LIFETIME_HOURS: i64 = 24;

/// Computes the expiry timestamp for a link created at `now`.
///
/// - Anonymous callers: exactly 24 hours after creation, regardless of plan.
/// - Authenticated callers: `now + plan.link_expiry_days` days, or `None`
///   (never expires) when the plan has no expiry configured.
pub fn expiry_for(plan: &Plan, is_anonymous: bool, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if is_anonymous {
        return Some(now + Duration::hours(ANONYMOUS_LINK_LIFETIME_HOURS));
    }

    plan.link_expiry_days
        .map(|days| now + Duration::days(i64::from(days)))
}

/// Computes the expiry applied to a user's existing links when their plan
/// changes (payment webhook).
///
/// The clock restarts at upgrade time: links get `now + expiry_days` under the
/// new plan, or become permanent when the plan has no expiry.
pub fn expiry_after_upgrade(plan: &Plan, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    plan.link_expiry_days
        .map(|days| now + Duration::days(i64::from(days)))
}
