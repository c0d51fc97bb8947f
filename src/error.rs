//! Application error type mapped to HTTP responses.
//!
//! Every fallible operation in the service surfaces an [`AppError`], which is
//! rendered as a JSON body of the shape:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "...", "details": { } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// JSON envelope for error responses.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description embedded in responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Application-level error with HTTP status mapping.
#[derive(Debug)]
pub enum AppError {
    /// 400 Bad Request — malformed input.
    Validation { message: String, details: Value },
    /// 401 Unauthorized — missing or invalid session/admin token.
    Unauthorized { message: String, details: Value },
    /// 403 Forbidden — feature not included in the caller's plan.
    Forbidden { message: String, details: Value },
    /// 404 Not Found — missing link or resource.
    NotFound { message: String, details: Value },
    /// 409 Conflict — alias/short-code already taken.
    Conflict { message: String, details: Value },
    /// 410 Gone — the link exists but has expired.
    Gone { message: String, details: Value },
    /// 500 Internal Server Error — unexpected or database failure.
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Gone { .. } => StatusCode::GONE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Gone { .. } => "link_expired",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// Converts the error into its serializable [`ErrorInfo`] form.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::Validation { message, details }
            | Self::Unauthorized { message, details }
            | Self::Forbidden { message, details }
            | Self::NotFound { message, details }
            | Self::Conflict { message, details }
            | Self::Gone { message, details }
            | Self::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let info = self.to_error_info();
        write!(f, "{}: {}", info.code, info.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&e).unwrap_or_else(|_| json!({})),
        )
    }
}
