//! Review-related DTOs.

use reviews_core::{ProductId, Review, ReviewId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use reviews_core::validation::rules::not_blank;

/// Request to create a review.
///
/// Field names match the stored record. Anything else in the body is
/// rejected.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateReviewRequest {
    #[serde(rename = "ProductID")]
    #[validate(
        length(max = 255, message = "ProductID cannot exceed 255 characters"),
        custom(function = "not_blank", message = "ProductID is required")
    )]
    pub product_id: String,

    #[serde(rename = "UserID", default)]
    #[validate(length(max = 255, message = "UserID cannot exceed 255 characters"))]
    pub user_id: Option<String>,

    #[serde(rename = "Title", default)]
    #[validate(length(max = 255, message = "Title cannot exceed 255 characters"))]
    pub title: String,

    #[serde(rename = "Comment", default)]
    #[validate(length(max = 5000, message = "Comment cannot exceed 5000 characters"))]
    pub comment: String,

    #[serde(rename = "Rating")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
}

/// Body of the like/dislike/unlike/undislike endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VoteRequest {
    #[serde(rename = "UserID")]
    #[validate(
        length(max = 255, message = "UserID cannot exceed 255 characters"),
        custom(function = "not_blank", message = "UserID is required")
    )]
    pub user_id: String,
}

/// A product's reviews and whether they came from the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewListResponse {
    pub cached: bool,
    pub reviews: Vec<Review>,
}

/// Mean rating of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AverageRatingResponse {
    pub product_id: ProductId,
    /// Rounded to two decimals, 0 when the product has no reviews.
    pub average_rating: f64,
}

/// Outcome of a create.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedReviewResponse {
    pub message: String,
    pub id: ReviewId,
}

/// Plain acknowledgement of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
