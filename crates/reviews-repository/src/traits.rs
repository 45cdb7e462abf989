//! Repository trait definitions.

use async_trait::async_trait;
use reviews_core::{
    Interface, ProductId, Rating, Review, ReviewId, ReviewsResult, UserId, VoteAction,
    VoteTransition,
};

/// Document store for reviews.
///
/// Every list and aggregate query excludes soft-deleted reviews. Only the
/// by-identifier lookup sees them.
#[async_trait]
pub trait ReviewRepository: Interface + Send + Sync {
    /// Finds a review by ID, including soft-deleted ones.
    async fn find_by_id(&self, id: ReviewId) -> ReviewsResult<Option<Review>>;

    /// Lists the non-deleted reviews of a product, optionally restricted to
    /// one exact rating. Oldest first.
    async fn find_by_product(
        &self,
        product_id: &ProductId,
        rating: Option<Rating>,
    ) -> ReviewsResult<Vec<Review>>;

    /// Inserts a new review. `Ok` means the insert has committed.
    async fn save(&self, review: &Review) -> ReviewsResult<()>;

    /// Applies a vote atomically.
    ///
    /// The voter's current state is read and the transition written under
    /// one lock, so concurrent votes can neither double count nor leave the
    /// counters out of step with the vote sets. Fails with `NotFound` for an
    /// unknown review and `InvalidTransition` when `action` does not apply,
    /// in both cases without writing anything.
    async fn apply_vote(
        &self,
        id: ReviewId,
        user: &UserId,
        action: VoteAction,
    ) -> ReviewsResult<VoteTransition>;

    /// Sets the soft-delete flag. Votes and counters are untouched.
    async fn soft_delete(&self, id: ReviewId) -> ReviewsResult<()>;

    /// Mean rating of the product's non-deleted reviews, `None` when there
    /// are none.
    async fn average_rating(&self, product_id: &ProductId) -> ReviewsResult<Option<f64>>;

    /// Number of non-deleted reviews per rating. Ratings without reviews
    /// are omitted.
    async fn rating_counts(&self, product_id: &ProductId) -> ReviewsResult<Vec<(Rating, u64)>>;
}
