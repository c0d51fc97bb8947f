//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod health;
pub mod links;
pub mod payment;
pub mod plans;
pub mod redirect;

pub use admin::{
    admin_delete_link_handler, admin_links_handler, admin_login_handler, admin_stats_handler,
    admin_update_link_handler,
};
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, list_anonymous_links_handler, list_links_handler,
};
pub use payment::{checkout_handler, webhook_handler};
pub use plans::{plans_handler, user_plan_handler};
pub use redirect::redirect_handler;
