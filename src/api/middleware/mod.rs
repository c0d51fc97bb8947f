//! HTTP middleware for request processing and protection.
//!
//! Provides bearer authentication, admin token verification, rate limiting,
//! and observability middleware.

pub mod admin_auth;
pub mod auth;
pub mod rate_limit;
pub mod tracing;
