//! Target URL validation.
//!
//! Links may only point at absolute HTTP/HTTPS URLs. The URL is stored as
//! submitted; rejection happens up front so `javascript:`, `data:`, `file:`
//! and friends never reach the redirect path.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Validates that `input` is an absolute http/https URL with a host.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for malformed URLs or unsupported schemes.
pub fn validate_target_url(input: &str) -> Result<(), AppError> {
    let url = Url::parse(input)
        .map_err(|e| AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() })))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::bad_request(
                "Only HTTP and HTTPS URLs are allowed",
                json!({ "scheme": other }),
            ));
        }
    }

    if url.host_str().is_none() {
        return Err(AppError::bad_request(
            "URL must include a host",
            json!({ "url": input }),
        ));
    }

    Ok(())
}
