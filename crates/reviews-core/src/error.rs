//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the reviews service.
///
/// Client-facing variants (`NotFound`, `InvalidTransition`, `Validation`)
/// describe a request the service refused; infrastructure variants describe
/// a collaborator that failed.
#[derive(Error, Debug)]
pub enum ReviewsError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Vote action not applicable to the voter's current state
    #[error("{0}")]
    InvalidTransition(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReviewsError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidTransition(_) | Self::Validation(_) => 400,
            Self::Database(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates an invalid transition error.
    #[must_use]
    pub fn invalid_transition<T: Into<String>>(message: T) -> Self {
        Self::InvalidTransition(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ReviewsError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ReviewsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `ReviewsError`.
    #[must_use]
    pub fn from_error(error: &ReviewsError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&ReviewsError> for ErrorResponse {
    fn from(error: &ReviewsError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ReviewsError::not_found("Review", 1).status_code(), 404);
        assert_eq!(ReviewsError::invalid_transition("Already liked").status_code(), 400);
        assert_eq!(ReviewsError::validation("bad rating").status_code(), 400);
        assert_eq!(ReviewsError::Database("down".to_string()).status_code(), 500);
        assert_eq!(ReviewsError::Cache("down".to_string()).status_code(), 500);
        assert_eq!(ReviewsError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ReviewsError::not_found("Review", 1).error_code(), "NOT_FOUND");
        assert_eq!(
            ReviewsError::invalid_transition("Not liked yet").error_code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(ReviewsError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(ReviewsError::Database("db".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(ReviewsError::Cache("c".to_string()).error_code(), "CACHE_ERROR");
        assert_eq!(ReviewsError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_invalid_transition_message_is_verbatim() {
        let err = ReviewsError::invalid_transition("Already liked");
        assert_eq!(err.to_string(), "Already liked");
    }

    #[test]
    fn test_not_found_message() {
        let err = ReviewsError::not_found("Review", "abc");
        assert_eq!(err.to_string(), "Review not found: abc");
    }

    #[test]
    fn test_error_response_from_error() {
        let err = ReviewsError::not_found("Review", 1);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(!response.message.is_empty());
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = ReviewsError::validation("bad input");
        let details = vec![FieldError {
            field: "rating".to_string(),
            message: "Rating must be between 1 and 5".to_string(),
            code: "range".to_string(),
        }];
        let response = ErrorResponse::from_error(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u8>("not json").unwrap_err();
        let err: ReviewsError = json_err.into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
