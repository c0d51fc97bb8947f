//! Anonymous caller fingerprinting.
//!
//! Anonymous links are scoped to a heuristic client identifier so a visitor
//! can see their own recent links without an account. This is best-effort
//! identification, not authentication.

use axum::http::{HeaderMap, header};

/// Fallback fingerprint when no identifying header is present.
pub const ANONYMOUS_FALLBACK: &str = "anonymous";

/// Derives a fingerprint for an anonymous caller from request headers.
///
/// Priority: `X-Forwarded-For`, then `User-Agent`, then a fixed fallback.
pub fn fingerprint_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get(header::USER_AGENT))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| ANONYMOUS_FALLBACK.to_string())
}
