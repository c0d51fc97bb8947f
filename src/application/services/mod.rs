//! Application services orchestrating domain logic over the repositories.

pub mod admin_service;
pub mod auth_service;
pub mod billing_service;
pub mod link_service;
pub mod plan_service;

pub use admin_service::{AdminCredentials, AdminLink, AdminService, AdminStats};
pub use auth_service::AuthService;
pub use billing_service::BillingService;
pub use link_service::{Caller, LinkService};
pub use plan_service::PlanService;
