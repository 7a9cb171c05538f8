//! Error handling for the API server
//!
//! Handlers return `ApiResult<T>`; every [`ApiError`] renders as a JSON body
//! with a stable error code and an HTTP status. The core's classified
//! errors convert via `From`, so handlers mostly just use `?`.
//!
//! Note the deliberate merges inherited from the core: credential failures
//! share one 401, and foreign resources surface as 404, never 403.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use taskdeck_shared::auth::jwt::TokenError;
use taskdeck_shared::error::ServiceError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate username
    Conflict(String),

    /// Unprocessable entity (422), request body validation
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    Internal(String),

    /// Service unavailable (503), transient store failure
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code (e.g. "conflict", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Per-field validation errors, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "validation failed: {} errors", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Internal(msg) => {
                // Log the detail, don't expose it
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "an internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "service temporarily unavailable".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ServiceError::DuplicateUsername => {
                ApiError::Conflict("username is already taken".to_string())
            }
            ServiceError::InvalidCredentials => {
                ApiError::Unauthorized("invalid username or password".to_string())
            }
            ServiceError::Expired => ApiError::Unauthorized("token has expired".to_string()),
            ServiceError::InvalidSignature | ServiceError::Malformed => {
                ApiError::Unauthorized("invalid token".to_string())
            }
            ServiceError::Forbidden => {
                ApiError::Forbidden("not allowed to access this resource".to_string())
            }
            ServiceError::NotFound => ApiError::NotFound("resource not found".to_string()),
            ServiceError::Transient(msg) => ApiError::ServiceUnavailable(msg),
            ServiceError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::from(ServiceError::from(err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}
