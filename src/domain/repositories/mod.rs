//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; concrete implementations
//! live in `crate::infrastructure::persistence`. Mock implementations are
//! auto-generated via `mockall` for testing.

pub mod link_repository;
pub mod plan_repository;
pub mod session_repository;
pub mod user_repository;

pub use link_repository::LinkRepository;
pub use plan_repository::PlanRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use plan_repository::MockPlanRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
