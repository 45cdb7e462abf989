//! Reviews Test Utilities
//!
//! Shared test infrastructure for the reviews workspace:
//! - an in-memory review store with the same filtering and vote rules as
//!   the MySQL one
//! - an in-memory TTL cache whose reads, writes and deletes can be made to
//!   fail independently
//! - fixtures for reviews and requests

pub use reviews_core::{
    ProductId, Rating, Review, ReviewId, ReviewsError, ReviewsResult, UserId, VoteAction,
    VoteState, VoteTransition,
};

use async_trait::async_trait;
use reviews_repository::ReviewRepository;
use reviews_service::{
    CacheInterface, CreateReviewRequest, ReviewCache, ReviewServiceComponent, VoteRequest,
    DEFAULT_TTL,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Review store backed by a map.
///
/// Votes are applied under the map lock, which gives the same atomicity as
/// the row lock in MySQL.
#[derive(Debug, Default)]
pub struct InMemoryReviewRepository {
    reviews: Mutex<HashMap<ReviewId, Review>>,
    failing: AtomicBool,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `reviews`.
    pub fn with_reviews(reviews: impl IntoIterator<Item = Review>) -> Self {
        let repo = Self::new();
        for review in reviews {
            repo.insert(review);
        }
        repo
    }

    /// Inserts or replaces a review directly, bypassing failure injection.
    pub fn insert(&self, review: Review) {
        self.lock().insert(review.id, review);
    }

    /// Returns a stored review directly, bypassing failure injection.
    pub fn get(&self, id: ReviewId) -> Option<Review> {
        self.lock().get(&id).cloned()
    }

    /// Makes every trait operation fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ReviewId, Review>> {
        self.reviews.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> ReviewsResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ReviewsError::Database("store unavailable".to_string()));
        }
        Ok(())
    }

    fn live(&self, product_id: &ProductId) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .lock()
            .values()
            .filter(|r| !r.is_deleted && &r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        reviews
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_by_id(&self, id: ReviewId) -> ReviewsResult<Option<Review>> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn find_by_product(
        &self,
        product_id: &ProductId,
        rating: Option<Rating>,
    ) -> ReviewsResult<Vec<Review>> {
        self.check()?;
        let mut reviews = self.live(product_id);
        if let Some(rating) = rating {
            reviews.retain(|r| r.rating == rating);
        }
        Ok(reviews)
    }

    async fn save(&self, review: &Review) -> ReviewsResult<()> {
        self.check()?;
        self.insert(review.clone());
        Ok(())
    }

    async fn apply_vote(
        &self,
        id: ReviewId,
        user: &UserId,
        action: VoteAction,
    ) -> ReviewsResult<VoteTransition> {
        self.check()?;
        let mut reviews = self.lock();
        let review = reviews
            .get_mut(&id)
            .ok_or_else(|| ReviewsError::not_found("Review", id))?;

        let transition = action.transition(review.vote_state(user))?;
        review.record_vote(user, transition);
        Ok(transition)
    }

    async fn soft_delete(&self, id: ReviewId) -> ReviewsResult<()> {
        self.check()?;
        if let Some(review) = self.lock().get_mut(&id) {
            review.soft_delete();
        }
        Ok(())
    }

    async fn average_rating(&self, product_id: &ProductId) -> ReviewsResult<Option<f64>> {
        self.check()?;
        let ratings: Vec<f64> = self
            .live(product_id)
            .iter()
            .map(|r| f64::from(r.rating.value()))
            .collect();
        if ratings.is_empty() {
            return Ok(None);
        }
        #[allow(clippy::cast_precision_loss)]
        let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Ok(Some(average))
    }

    async fn rating_counts(&self, product_id: &ProductId) -> ReviewsResult<Vec<(Rating, u64)>> {
        self.check()?;
        let live = self.live(product_id);
        Ok(Rating::all()
            .map(|rating| {
                let count = live.iter().filter(|r| r.rating == rating).count() as u64;
                (rating, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}

// ============================================================================
// IN-MEMORY CACHE
// ============================================================================

/// TTL-honouring cache backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    deletes: AtomicUsize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, failing: bool) {
        self.fail_deletes.store(failing, Ordering::SeqCst);
    }

    /// Whether `key` holds an unexpired value.
    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// The unexpired value under `key`, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock()
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone())
    }

    /// Stores a value directly, bypassing failure injection.
    pub fn insert_raw(&self, key: &str, value: &str, ttl: Duration) {
        self.lock()
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
    }

    /// Number of delete calls that reached the cache, failed or not.
    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (String, Instant)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unavailable(flag: &AtomicBool) -> ReviewsResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(ReviewsError::Cache("cache unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> ReviewsResult<Option<String>> {
        Self::unavailable(&self.fail_reads)?;
        Ok(self.raw(key))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ReviewsResult<()> {
        Self::unavailable(&self.fail_writes)?;
        self.insert_raw(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> ReviewsResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Self::unavailable(&self.fail_deletes)?;
        let removed = self.lock().remove(key);
        Ok(removed.is_some_and(|(_, expires_at)| expires_at > Instant::now()))
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Key under which the default configuration caches a product's list.
pub fn list_key(product: &str) -> String {
    format!("reviews:{}", product)
}

/// A fresh review with an author, a title and a body.
///
/// # Panics
///
/// Panics if `rating` is outside 1..=5.
pub fn review(product: &str, rating: i64) -> Review {
    Review::new(
        ProductId::new(product),
        Rating::new(rating).unwrap_or_else(|e| panic!("fixture rating: {e}")),
        Some(UserId::new("author")),
        "Great product".to_string(),
        "Works as described".to_string(),
    )
}

/// A create request with only the required fields.
pub fn create_request(product: &str, rating: i64) -> CreateReviewRequest {
    CreateReviewRequest {
        product_id: product.to_string(),
        user_id: Some("author".to_string()),
        title: "Great product".to_string(),
        comment: "Works as described".to_string(),
        rating,
    }
}

pub fn vote_request(user: &str) -> VoteRequest {
    VoteRequest {
        user_id: user.to_string(),
    }
}

/// A service wired to the given fakes with the default TTL and key prefix.
pub fn review_service(
    repo: Arc<InMemoryReviewRepository>,
    cache: Arc<InMemoryCache>,
) -> ReviewServiceComponent {
    review_service_with_ttl(repo, cache, DEFAULT_TTL)
}

/// Same as [`review_service`] with a custom entry lifetime.
pub fn review_service_with_ttl(
    repo: Arc<InMemoryReviewRepository>,
    cache: Arc<InMemoryCache>,
    ttl: Duration,
) -> ReviewServiceComponent {
    let review_cache = Arc::new(ReviewCache::new(cache, ttl, "reviews"));
    ReviewServiceComponent::new(repo, review_cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_repository_excludes_deleted_from_lists() {
        let kept = review("p1", 5);
        let mut gone = review("p1", 1);
        gone.soft_delete();
        let repo = InMemoryReviewRepository::with_reviews([kept.clone(), gone.clone()]);
        let product = ProductId::new("p1");

        let listed = repo.find_by_product(&product, None).await.unwrap();
        assert_eq!(listed, vec![kept]);
        assert_eq!(repo.rating_counts(&product).await.unwrap().len(), 1);
        assert!(repo.find_by_id(gone.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_repository_vote_rules() {
        let target = review("p1", 3);
        let repo = InMemoryReviewRepository::with_reviews([target.clone()]);
        let alice = UserId::new("alice");

        repo.apply_vote(target.id, &alice, VoteAction::Dislike).await.unwrap();
        repo.apply_vote(target.id, &alice, VoteAction::Like).await.unwrap();
        let err = repo
            .apply_vote(target.id, &alice, VoteAction::Like)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Already liked");

        let stored = repo.get(target.id).unwrap();
        assert_eq!((stored.like_count, stored.dislike_count), (1, 0));
        assert!(stored.counters_consistent());
    }

    #[tokio::test]
    async fn test_failing_repository() {
        let repo = InMemoryReviewRepository::new();
        repo.set_failing(true);

        let err = repo.find_by_id(ReviewId::new()).await.unwrap_err();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_cache_entries_expire() {
        let cache = InMemoryCache::new();
        cache
            .set_raw("k", "v", Duration::from_millis(20))
            .await
            .unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
        assert!(!cache.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_cache_failure_toggles() {
        let cache = InMemoryCache::new();
        cache.fail_deletes(true);

        assert!(cache.delete("k").await.is_err());
        assert_eq!(cache.delete_calls(), 1);
        assert!(cache.set_raw("k", "v", DEFAULT_TTL).await.is_ok());
    }
}
