//! OpenAPI documentation configuration.

use reviews_core::{
    ErrorResponse, FieldError, ProductId, Rating, RatingBucket, RatingDistribution, Review,
    ReviewId, UserId,
};
use reviews_service::{
    AverageRatingResponse, CreateReviewRequest, CreatedReviewResponse, MessageResponse,
    ReviewListResponse, VoteRequest,
};
use utoipa::OpenApi;

use crate::controllers::health_controller::HealthResponse;

/// OpenAPI documentation for the product reviews API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Reviews API",
        version = "1.0.0",
        description = "Product reviews with cached listings, ratings and votes",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Review endpoints
        crate::controllers::review_controller::list_reviews,
        crate::controllers::review_controller::list_reviews_by_rating,
        crate::controllers::review_controller::average_rating,
        crate::controllers::review_controller::rating_stats,
        crate::controllers::review_controller::get_review,
        crate::controllers::review_controller::create_review,
        crate::controllers::review_controller::delete_review,
        // Vote endpoints
        crate::controllers::review_controller::like_review,
        crate::controllers::review_controller::dislike_review,
        crate::controllers::review_controller::unlike_review,
        crate::controllers::review_controller::undislike_review,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
        crate::controllers::metrics_controller::metrics_handler,
    ),
    components(
        schemas(
            // Core types
            ReviewId,
            ProductId,
            UserId,
            Rating,
            Review,
            RatingBucket,
            RatingDistribution,
            ErrorResponse,
            FieldError,
            // Review DTOs
            CreateReviewRequest,
            VoteRequest,
            ReviewListResponse,
            AverageRatingResponse,
            CreatedReviewResponse,
            MessageResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "reviews", description = "Review listing, aggregates and lifecycle"),
        (name = "votes", description = "Per-user like and dislike state"),
        (name = "health", description = "Health check endpoints"),
        (name = "observability", description = "Metrics exposition")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_review_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/reviews",
            "/reviews/{product_id}",
            "/reviews/product/{product_id}",
            "/reviews/product/{product_id}/stats",
            "/reviews/id/{id}",
            "/reviews/{id}/like",
            "/reviews/{id}/undislike",
            "/ready",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
