//! Validation utilities.

use crate::{FieldError, ReviewsError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `ReviewsError` on failure.
    fn validate_request(&self) -> Result<(), ReviewsError> {
        self.validate().map_err(|e| validation_errors_to_reviews_error(&e))
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `ReviewsError`.
#[must_use]
pub fn validation_errors_to_reviews_error(errors: &ValidationErrors) -> ReviewsError {
    let message = field_errors(errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    ReviewsError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(custom(function = "not_blank"))]
        product_id: String,
        #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
        rating: i64,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let probe = Probe {
            product_id: " ".to_string(),
            rating: 0,
        };
        let err = probe.validate_request().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        let message = err.to_string();
        assert!(message.contains("product_id"));
        assert!(message.contains("Rating must be between 1 and 5"));
    }

    #[test]
    fn test_validate_request_ok() {
        let probe = Probe {
            product_id: "p1".to_string(),
            rating: 3,
        };
        assert!(probe.validate_request().is_ok());
    }
}
