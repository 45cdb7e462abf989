//! Review service trait definition.

use crate::dto::{
    AverageRatingResponse, CreateReviewRequest, CreatedReviewResponse, MessageResponse,
    ReviewListResponse, VoteRequest,
};
use async_trait::async_trait;
use reviews_core::{
    Interface, ProductId, Rating, RatingDistribution, Review, ReviewId, ReviewsResult, VoteAction,
};

/// Review service trait.
///
/// Reads of the unfiltered list go through the cache. Every successful
/// mutation invalidates the product's cache entry once the store has
/// committed it.
#[async_trait]
pub trait ReviewService: Interface + Send + Sync {
    /// Lists a product's reviews, populating the cache on a miss.
    async fn list_reviews(&self, product_id: &ProductId) -> ReviewsResult<ReviewListResponse>;

    /// Lists a product's reviews with an optional exact rating.
    ///
    /// Served from a cached unfiltered list when one exists; otherwise the
    /// store filters and the cache is left alone.
    async fn list_reviews_by_rating(
        &self,
        product_id: &ProductId,
        rating: Option<Rating>,
    ) -> ReviewsResult<ReviewListResponse>;

    /// Gets a review by ID, soft-deleted or not.
    async fn get_review(&self, id: ReviewId) -> ReviewsResult<Review>;

    /// Mean rating of a product, read live from the store.
    async fn average_rating(&self, product_id: &ProductId) -> ReviewsResult<AverageRatingResponse>;

    /// Per-rating breakdown of a product, read live from the store.
    async fn rating_stats(&self, product_id: &ProductId) -> ReviewsResult<RatingDistribution>;

    /// Creates a review.
    async fn create_review(&self, request: CreateReviewRequest) -> ReviewsResult<CreatedReviewResponse>;

    /// Applies a like, dislike, unlike or undislike.
    async fn vote(
        &self,
        id: ReviewId,
        action: VoteAction,
        request: VoteRequest,
    ) -> ReviewsResult<MessageResponse>;

    /// Soft-deletes a review.
    async fn delete_review(&self, id: ReviewId) -> ReviewsResult<MessageResponse>;
}
