//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without infrastructure dependencies.
//! Creation inputs follow the "new type" pattern (`NewLink`, `NewPlan`) and
//! partial updates use patch structs (`LinkPatch`).

pub mod link;
pub mod plan;
pub mod user;

pub use link::{Link, LinkPatch, NewLink};
pub use plan::{FREE_PLAN, NewPlan, Plan, default_plans};
pub use user::{UserPlan, UserSummary};
