//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes JSON and validates it with the
//! `validator` crate. Bodies that do not fit the type keep axum's status
//! (400 for bad syntax, 415 for a missing content type, 422 for a wrong
//! shape such as an unknown field). Rule violations are 422 with
//! field-level details.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reviews_core::{field_errors, ErrorResponse, ReviewsError};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::responses::error_response;

/// JSON extractor that automatically validates the deserialized value.
///
/// # Example
///
/// ```ignore
/// use reviews_rest::extractors::ValidatedJson;
/// use reviews_service::VoteRequest;
///
/// async fn like(ValidatedJson(request): ValidatedJson<VoteRequest>) {
///     // request.user_id is non-blank here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => error_response(
                rejection.status(),
                ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: rejection.body_text(),
                    details: None,
                },
            ),
            Self::ValidationError(errors) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::from_error(&ReviewsError::validation("Request validation failed"))
                    .with_details(field_errors(&errors)),
            ),
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::CONTENT_TYPE;
    use reviews_service::{CreateReviewRequest, VoteRequest};

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn reject<T>(body: &str) -> (StatusCode, serde_json::Value)
    where
        T: DeserializeOwned + Validate + std::fmt::Debug,
    {
        let rejection = ValidatedJson::<T>::from_request(json_request(body), &())
            .await
            .unwrap_err();
        let response = rejection.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(request) = ValidatedJson::<VoteRequest>::from_request(
            json_request(r#"{"UserID": "alice"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(request.user_id, "alice");
    }

    #[tokio::test]
    async fn test_rule_violation_is_422_with_details() {
        let (status, body) =
            reject::<CreateReviewRequest>(r#"{"ProductID": "p1", "Rating": 9}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Validation error: Request validation failed"
        );
        assert_eq!(body["error"]["details"][0]["field"], "rating");
    }

    #[tokio::test]
    async fn test_unknown_field_is_422() {
        let (status, body) = reject::<CreateReviewRequest>(
            r#"{"ProductID": "p1", "Rating": 4, "isDeleted": true}"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (status, _) = reject::<VoteRequest>("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
