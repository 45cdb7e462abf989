//! Review service implementation.

use crate::cache::ReviewCacheInterface;
use crate::dto::{
    AverageRatingResponse, CreateReviewRequest, CreatedReviewResponse, MessageResponse,
    ReviewListResponse, VoteRequest,
};
use crate::metrics::CacheMetrics;
use crate::review_service::ReviewService;
use async_trait::async_trait;
use reviews_core::{
    round2, ProductId, Rating, RatingDistribution, Review, ReviewId, ReviewsError, ReviewsResult,
    UserId, ValidateExt, VoteAction,
};
use reviews_repository::ReviewRepository;
use shaku::Component;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Shaku component backing [`ReviewService`].
#[derive(Component)]
#[shaku(interface = ReviewService)]
pub struct ReviewServiceComponent {
    #[shaku(inject)]
    review_repository: Arc<dyn ReviewRepository>,
    #[shaku(inject)]
    review_cache: Arc<dyn ReviewCacheInterface>,
}

impl ReviewServiceComponent {
    /// Creates a service outside of a DI module.
    #[must_use]
    pub fn new(
        review_repository: Arc<dyn ReviewRepository>,
        review_cache: Arc<dyn ReviewCacheInterface>,
    ) -> Self {
        Self {
            review_repository,
            review_cache,
        }
    }

    async fn query_reviews(
        &self,
        product_id: &ProductId,
        rating: Option<Rating>,
    ) -> ReviewsResult<Vec<Review>> {
        let started = Instant::now();
        let reviews = self
            .review_repository
            .find_by_product(product_id, rating)
            .await?;
        CacheMetrics::store_list(started.elapsed(), rating.is_some());
        Ok(reviews)
    }

    async fn find_review(&self, id: ReviewId) -> ReviewsResult<Review> {
        self.review_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReviewsError::not_found("Review", id))
    }
}

#[async_trait]
impl ReviewService for ReviewServiceComponent {
    async fn list_reviews(&self, product_id: &ProductId) -> ReviewsResult<ReviewListResponse> {
        debug!("Listing reviews for product: {}", product_id);

        if let Some(reviews) = self.review_cache.get(product_id).await {
            return Ok(ReviewListResponse {
                cached: true,
                reviews,
            });
        }

        let reviews = self.query_reviews(product_id, None).await?;
        self.review_cache.populate(product_id, &reviews).await;

        Ok(ReviewListResponse {
            cached: false,
            reviews,
        })
    }

    async fn list_reviews_by_rating(
        &self,
        product_id: &ProductId,
        rating: Option<Rating>,
    ) -> ReviewsResult<ReviewListResponse> {
        debug!("Listing reviews for product: {}, rating: {:?}", product_id, rating);

        if let Some(reviews) = self.review_cache.get(product_id).await {
            let reviews = match rating {
                Some(rating) => reviews.into_iter().filter(|r| r.rating == rating).collect(),
                None => reviews,
            };
            return Ok(ReviewListResponse {
                cached: true,
                reviews,
            });
        }

        // Filtered results never populate the unfiltered entry.
        let reviews = self.query_reviews(product_id, rating).await?;

        Ok(ReviewListResponse {
            cached: false,
            reviews,
        })
    }

    async fn get_review(&self, id: ReviewId) -> ReviewsResult<Review> {
        debug!("Getting review: {}", id);
        self.find_review(id).await
    }

    async fn average_rating(&self, product_id: &ProductId) -> ReviewsResult<AverageRatingResponse> {
        debug!("Computing average rating for product: {}", product_id);

        let average = self.review_repository.average_rating(product_id).await?;

        Ok(AverageRatingResponse {
            product_id: product_id.clone(),
            average_rating: average.map_or(0.0, round2),
        })
    }

    async fn rating_stats(&self, product_id: &ProductId) -> ReviewsResult<RatingDistribution> {
        debug!("Computing rating distribution for product: {}", product_id);

        let counts = self.review_repository.rating_counts(product_id).await?;
        Ok(RatingDistribution::from_counts(&counts))
    }

    async fn create_review(&self, request: CreateReviewRequest) -> ReviewsResult<CreatedReviewResponse> {
        debug!("Creating review for product: {}", request.product_id);

        request.validate_request()?;
        let rating = Rating::new(request.rating)?;

        let review = Review::new(
            ProductId::new(request.product_id),
            rating,
            request.user_id.map(UserId::new),
            request.title,
            request.comment,
        );

        self.review_repository.save(&review).await?;
        info!("Review created: {} for product {}", review.id, review.product_id);

        self.review_cache.invalidate(&review.product_id).await;

        Ok(CreatedReviewResponse {
            message: "Review created".to_string(),
            id: review.id,
        })
    }

    async fn vote(
        &self,
        id: ReviewId,
        action: VoteAction,
        request: VoteRequest,
    ) -> ReviewsResult<MessageResponse> {
        debug!("Applying {} to review {} by {}", action, id, request.user_id);

        request.validate_request()?;
        let user = UserId::new(request.user_id);

        let review = self.find_review(id).await?;
        let transition = self
            .review_repository
            .apply_vote(id, &user, action)
            .await?;
        info!(
            "Vote recorded on review {}: {} moved {} -> {}",
            id, user, transition.from, transition.to
        );

        self.review_cache.invalidate(&review.product_id).await;

        Ok(MessageResponse::new(action.success_message()))
    }

    async fn delete_review(&self, id: ReviewId) -> ReviewsResult<MessageResponse> {
        debug!("Soft-deleting review: {}", id);

        let review = self.find_review(id).await?;
        self.review_repository.soft_delete(id).await?;
        info!("Review soft-deleted: {}", id);

        self.review_cache.invalidate(&review.product_id).await;

        Ok(MessageResponse::new("Deleted (soft)"))
    }
}

impl std::fmt::Debug for ReviewServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewServiceComponent").finish_non_exhaustive()
    }
}
