//! DTOs for the health check endpoint.

use serde::Serialize;

/// Overall service health with per-component checks.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
}

/// Status of an individual component check.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
