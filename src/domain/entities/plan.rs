//! Plan entity driving expiry and feature entitlements.

use chrono::{DateTime, Utc};

/// Name of the fallback plan used when a user's plan record is missing
/// or inactive.
pub const FREE_PLAN: &str = "free";

/// A subscription plan record.
///
/// `link_expiry_days = None` means links created under this plan never expire.
#[derive(Debug, Clone)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub price_cents: i64,
    pub link_expiry_days: Option<i32>,
    pub custom_alias_allowed: bool,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Returns true if this plan can be purchased through checkout.
    pub fn is_paid(&self) -> bool {
        self.price_cents > 0
    }
}

/// Input data for creating a plan record (seeding, admin CLI).
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub display_name: String,
    pub price_cents: i64,
    pub link_expiry_days: Option<i32>,
    pub custom_alias_allowed: bool,
    pub features: Vec<String>,
}

/// The default plan catalogue, matching the seed migration.
pub fn default_plans() -> Vec<NewPlan> {
    vec![
        NewPlan {
            name: "free".to_string(),
            display_name: "Free".to_string(),
            price_cents: 0,
            link_expiry_days: Some(7),
            custom_alias_allowed: true,
            features: vec![
                "7-day link expiry".to_string(),
                "Custom aliases".to_string(),
                "Click tracking".to_string(),
            ],
        },
        NewPlan {
            name: "premium".to_string(),
            display_name: "Premium".to_string(),
            price_cents: 500,
            link_expiry_days: Some(30),
            custom_alias_allowed: true,
            features: vec![
                "30-day link expiry".to_string(),
                "Custom aliases".to_string(),
                "Click tracking".to_string(),
                "Priority support".to_string(),
            ],
        },
        NewPlan {
            name: "premium_plus".to_string(),
            display_name: "Premium Plus".to_string(),
            price_cents: 1500,
            link_expiry_days: None,
            custom_alias_allowed: true,
            features: vec![
                "Lifetime links".to_string(),
                "Custom aliases".to_string(),
                "Click tracking".to_string(),
                "Priority support".to_string(),
                "Advanced analytics".to_string(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue_has_free_fallback() {
        let plans = default_plans();
        assert!(plans.iter().any(|p| p.name == FREE_PLAN));
    }

    #[test]
    fn test_paid_detection() {
        let plans = default_plans();
        let free = plans.iter().find(|p| p.name == "free").unwrap();
        let premium = plans.iter().find(|p| p.name == "premium").unwrap();

        assert_eq!(free.price_cents, 0);
        assert!(premium.price_cents > 0);
    }

    #[test]
    fn test_premium_plus_is_permanent() {
        let plans = default_plans();
        let plus = plans.iter().find(|p| p.name == "premium_plus").unwrap();
        assert!(plus.link_expiry_days.is_none());
    }
}
