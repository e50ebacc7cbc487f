// ABOUTME: Unified error handling for the Tutorhub backend
// ABOUTME: Standard error codes, HTTP status mapping, and JSON response formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Defines the standard error type surfaced by every layer of the server.
//! Authentication failures (missing, invalid, or expired tokens and bad
//! credentials) are kept distinct from authorization failures (valid
//! identity, insufficient ability) so clients can tell "log in again" apart
//! from "you can't do that". Store failures never leak internal detail to
//! the caller.

use crate::constants::error_messages;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1003,

    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 401 Unauthorized: no token, bad token, or expired token all
            // terminate the request identically for the caller
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,

            // 403 Forbidden: authenticated but not entitled
            Self::PermissionDenied => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 422 Unprocessable Entity
            Self::InvalidInput => 422,

            // 502 Bad Gateway
            Self::ExternalServiceError => 502,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => 500,
        }
    }

    /// Whether the internal message is safe to surface to the caller
    #[must_use]
    pub const fn is_client_safe(&self) -> bool {
        !matches!(
            self,
            Self::InternalError | Self::DatabaseError | Self::ConfigError
        )
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured per-field validation errors, when applicable
    pub errors: Option<serde_json::Value>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: None,
            source: None,
        }
    }

    /// Attach per-field validation details
    #[must_use]
    pub fn with_errors(mut self, errors: serde_json::Value) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body
///
/// Authentication failures carry a `status` field alongside the message
/// (the envelope shape every client branch expects); permission denials
/// carry the message alone.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        let status = error.http_status();
        let message = if error.code.is_client_safe() {
            error.message.clone()
        } else {
            // Never echo storage/internal error text to the client
            "An unexpected error occurred".to_owned()
        };
        Self {
            message,
            status: (error.code != ErrorCode::PermissionDenied).then_some(status),
            errors: error.errors.clone(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.http_status())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        if !self.code.is_client_safe() {
            tracing::error!(code = ?self.code, error = %self.message, "request failed");
        }
        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// No bearer credential was presented
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, error_messages::NO_TOKEN)
    }

    /// Invalid or unknown authentication token
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication token past its TTL
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, error_messages::TOKEN_EXPIRED)
    }

    /// Authenticated but lacking the required ability
    #[must_use]
    pub fn permission_denied() -> Self {
        Self::new(ErrorCode::PermissionDenied, error_messages::PERMISSION_DENIED)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

/// Conversion from anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::AuthInvalid.http_status(), 401);
        assert_eq!(ErrorCode::AuthExpired.http_status(), 401);
        assert_eq!(ErrorCode::PermissionDenied.http_status(), 403);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_store_failures_are_masked() {
        let error = AppError::database("connection refused at 10.0.0.3:5432");
        let response = ErrorResponse::from(&error);
        assert_eq!(response.message, "An unexpected error occurred");
        assert_eq!(response.status, Some(500));
    }

    #[test]
    fn test_permission_denied_body_has_no_status_field() {
        let error = AppError::permission_denied();
        let response = ErrorResponse::from(&error);
        assert!(response.status.is_none());

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("status"));
        assert!(json.contains("required permissions"));
    }

    #[test]
    fn test_auth_errors_carry_status() {
        let response = ErrorResponse::from(&AppError::auth_required());
        assert_eq!(response.message, "No token provided");
        assert_eq!(response.status, Some(401));
    }
}
