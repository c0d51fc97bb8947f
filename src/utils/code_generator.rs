//! Short code generation and custom alias validation.
//!
//! Random codes come from the OS entropy source and are encoded as URL-safe
//! base64, so generated codes and user aliases share the same
//! `[A-Za-z0-9_-]` alphabet.

use std::sync::LazyLock;

use base64::Engine as _;
use regex::Regex;
use serde_json::json;

use crate::error::AppError;

/// Length of random bytes before base64 encoding. 6 bytes encode to exactly
/// 8 URL-safe characters, giving a 2^48 code space.
const CODE_LENGTH_BYTES: usize = 6;

/// Maximum accepted custom alias length.
const MAX_ALIAS_LENGTH: usize = 64;

/// Allowed custom alias characters: letters, digits, hyphens, underscores.
static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-_]+$").unwrap());

/// Route segments that cannot be claimed as aliases to avoid shadowing
/// system endpoints.
const RESERVED_CODES: &[&str] = &["api", "health", "admin", "static", "s"];

/// Generates a random 8-character short code.
///
/// Uses `getrandom` for entropy and URL-safe base64 without padding.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - 1 to 64 characters
/// - Letters, digits, hyphens, and underscores only
/// - Cannot be a reserved system route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() || alias.len() > MAX_ALIAS_LENGTH {
        return Err(AppError::bad_request(
            "Custom alias must be 1-64 characters",
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, numbers, hyphens, and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_CODES.contains(&alias) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
