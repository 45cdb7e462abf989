//! Review controller.

use crate::{
    extractors::ValidatedJson,
    responses::{ok, AppError, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Router,
};
use reviews_core::{
    ProductId, Rating, RatingDistribution, Review, ReviewId, ReviewsError, VoteAction,
};
use reviews_service::{
    AverageRatingResponse, CreateReviewRequest, CreatedReviewResponse, MessageResponse,
    ReviewListResponse, VoteRequest,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Optional exact-rating filter.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RatingQuery {
    /// Only reviews with this rating (1-5).
    pub rating: Option<i64>,
}

/// Creates the review router.
///
/// `:id` is a product identifier on the list route and a review identifier
/// everywhere else.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/:id", get(list_reviews).delete(delete_review))
        .route("/reviews/:id/like", post(like_review))
        .route("/reviews/:id/dislike", post(dislike_review))
        .route("/reviews/:id/unlike", post(unlike_review))
        .route("/reviews/:id/undislike", post(undislike_review))
        .route("/reviews/id/:id", get(get_review))
        .route("/reviews/product/:id", get(list_reviews_by_rating))
        .route("/reviews/product/:id/average", get(average_rating))
        .route("/reviews/product/:id/stats", get(rating_stats))
}

/// List a product's reviews.
#[utoipa::path(
    get,
    path = "/reviews/{product_id}",
    tag = "reviews",
    params(("product_id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Reviews of the product", body = ReviewListResponse)
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<ReviewListResponse> {
    debug!("List reviews request: {}", product_id);

    let response = state
        .review_service
        .list_reviews(&ProductId::new(product_id))
        .await?;
    ok(response)
}

/// List a product's reviews, optionally with one rating.
#[utoipa::path(
    get,
    path = "/reviews/product/{product_id}",
    tag = "reviews",
    params(("product_id" = String, Path, description = "Product identifier"), RatingQuery),
    responses(
        (status = 200, description = "Matching reviews", body = ReviewListResponse),
        (status = 400, description = "Rating outside 1-5")
    )
)]
pub async fn list_reviews_by_rating(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(query): Query<RatingQuery>,
) -> ApiResult<ReviewListResponse> {
    debug!("List reviews by rating request: {} {:?}", product_id, query.rating);

    let rating = query.rating.map(Rating::new).transpose()?;
    let response = state
        .review_service
        .list_reviews_by_rating(&ProductId::new(product_id), rating)
        .await?;
    ok(response)
}

/// Mean rating of a product.
#[utoipa::path(
    get,
    path = "/reviews/product/{product_id}/average",
    tag = "reviews",
    params(("product_id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Average rating", body = AverageRatingResponse)
    )
)]
pub async fn average_rating(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<AverageRatingResponse> {
    let response = state
        .review_service
        .average_rating(&ProductId::new(product_id))
        .await?;
    ok(response)
}

/// Rating distribution of a product.
#[utoipa::path(
    get,
    path = "/reviews/product/{product_id}/stats",
    tag = "reviews",
    params(("product_id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Per-rating counts and percentages", body = RatingDistribution)
    )
)]
pub async fn rating_stats(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<RatingDistribution> {
    let response = state
        .review_service
        .rating_stats(&ProductId::new(product_id))
        .await?;
    ok(response)
}

/// Get a review by ID, including soft-deleted ones.
#[utoipa::path(
    get,
    path = "/reviews/id/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "The review", body = Review),
        (status = 400, description = "Malformed review ID"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Review> {
    let review_id = parse_review_id(&id)?;
    let response = state.review_service.get_review(review_id).await?;
    ok(response)
}

/// Create a review.
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = CreatedReviewResponse),
        (status = 422, description = "Invalid review")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> ApiResult<CreatedReviewResponse> {
    debug!("Create review request for product: {}", request.product_id);

    let response = state.review_service.create_review(request).await?;
    ok(response)
}

/// Like a review.
#[utoipa::path(
    post,
    path = "/reviews/{id}/like",
    tag = "votes",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Liked", body = MessageResponse),
        (status = 400, description = "Already liked"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn like_review(
    state: State<AppState>,
    id: Path<String>,
    request: ValidatedJson<VoteRequest>,
) -> ApiResult<MessageResponse> {
    vote(state, id, VoteAction::Like, request).await
}

/// Dislike a review.
#[utoipa::path(
    post,
    path = "/reviews/{id}/dislike",
    tag = "votes",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Disliked", body = MessageResponse),
        (status = 400, description = "Already disliked"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn dislike_review(
    state: State<AppState>,
    id: Path<String>,
    request: ValidatedJson<VoteRequest>,
) -> ApiResult<MessageResponse> {
    vote(state, id, VoteAction::Dislike, request).await
}

/// Withdraw a like.
#[utoipa::path(
    post,
    path = "/reviews/{id}/unlike",
    tag = "votes",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Unliked", body = MessageResponse),
        (status = 400, description = "Not liked yet"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn unlike_review(
    state: State<AppState>,
    id: Path<String>,
    request: ValidatedJson<VoteRequest>,
) -> ApiResult<MessageResponse> {
    vote(state, id, VoteAction::Unlike, request).await
}

/// Withdraw a dislike.
#[utoipa::path(
    post,
    path = "/reviews/{id}/undislike",
    tag = "votes",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Undisliked", body = MessageResponse),
        (status = 400, description = "Not disliked yet"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn undislike_review(
    state: State<AppState>,
    id: Path<String>,
    request: ValidatedJson<VoteRequest>,
) -> ApiResult<MessageResponse> {
    vote(state, id, VoteAction::Undislike, request).await
}

/// Soft-delete a review.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Deleted (soft)", body = MessageResponse),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    debug!("Delete review request: {}", id);

    let review_id = parse_review_id(&id)?;
    let response = state.review_service.delete_review(review_id).await?;
    ok(response)
}

async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    action: VoteAction,
    ValidatedJson(request): ValidatedJson<VoteRequest>,
) -> ApiResult<MessageResponse> {
    debug!("{} request on review: {}", action, id);

    let review_id = parse_review_id(&id)?;
    let response = state.review_service.vote(review_id, action, request).await?;
    ok(response)
}

fn parse_review_id(id: &str) -> Result<ReviewId, AppError> {
    ReviewId::parse(id)
        .map_err(|_| AppError(ReviewsError::validation(format!("Invalid review ID: {}", id))))
}
