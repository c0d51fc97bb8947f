//! Infrastructure layer: database access and external collaborators.

pub mod payment;
pub mod persistence;
