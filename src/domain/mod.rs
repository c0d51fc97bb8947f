//! Domain layer containing business entities and rules.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`expiry`] - Pure plan-driven expiry rules
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; repository traits are implemented in
//! [`crate::infrastructure::persistence`].

pub mod entities;
pub mod expiry;
pub mod repositories;
