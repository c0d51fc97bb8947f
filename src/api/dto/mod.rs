//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod admin;
pub mod health;
pub mod link;
pub mod payment;
pub mod plans;
