//! Shared utilities: code generation, URL validation, fingerprinting.

pub mod code_generator;
pub mod fingerprint;
pub mod target_url;
