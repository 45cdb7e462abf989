//! Cache-aside manager for per-product review lists.

use super::{cache_keys, CacheExt, CacheInterface};
use crate::metrics::CacheMetrics;
use async_trait::async_trait;
use reviews_core::{Interface, ProductId, Review};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Lifetime of a cached review list.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Read-through and invalidate-on-write contract for review lists.
///
/// None of these operations fail. A broken cache degrades to misses on
/// read and to logged, counted failures on write; entries heal on expiry.
#[async_trait]
pub trait ReviewCacheInterface: Interface + Send + Sync {
    /// Returns the cached unfiltered list of a product, `None` on a miss.
    async fn get(&self, product_id: &ProductId) -> Option<Vec<Review>>;

    /// Stores the unfiltered list of a product, replacing any previous entry.
    async fn populate(&self, product_id: &ProductId, reviews: &[Review]);

    /// Drops the product's entry. A missing entry is not an error.
    async fn invalidate(&self, product_id: &ProductId);
}

/// [`ReviewCacheInterface`] on top of a key-value [`CacheInterface`].
#[derive(Component)]
#[shaku(interface = ReviewCacheInterface)]
pub struct ReviewCache {
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(default = DEFAULT_TTL)]
    ttl: Duration,
    #[shaku(default = cache_keys::DEFAULT_PREFIX.to_string())]
    key_prefix: String,
}

impl ReviewCache {
    /// Creates a manager with the given entry lifetime and key namespace.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, ttl: Duration, key_prefix: impl Into<String>) -> Self {
        Self {
            cache,
            ttl,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, product_id: &ProductId) -> String {
        cache_keys::review_list(&self.key_prefix, product_id)
    }
}

impl std::fmt::Debug for ReviewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewCache")
            .field("ttl", &self.ttl)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReviewCacheInterface for ReviewCache {
    async fn get(&self, product_id: &ProductId) -> Option<Vec<Review>> {
        let key = self.key(product_id);

        match self.cache.get::<Vec<Review>>(&key).await {
            Ok(Some(reviews)) => {
                debug!(key = %key, count = reviews.len(), "Review list cache hit");
                CacheMetrics::hit();
                Some(reviews)
            }
            Ok(None) => {
                debug!(key = %key, "Review list cache miss");
                CacheMetrics::miss();
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to store");
                CacheMetrics::read_failed();
                CacheMetrics::miss();
                None
            }
        }
    }

    async fn populate(&self, product_id: &ProductId, reviews: &[Review]) {
        let key = self.key(product_id);

        if let Err(e) = self.cache.set(&key, reviews, self.ttl).await {
            warn!(key = %key, error = %e, "Failed to populate review list cache");
            CacheMetrics::populate_failed();
        }
    }

    async fn invalidate(&self, product_id: &ProductId) {
        let key = self.key(product_id);

        match self.cache.delete(&key).await {
            Ok(existed) => {
                debug!(key = %key, existed, "Invalidated review list cache");
                CacheMetrics::invalidated();
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to invalidate review list cache");
                CacheMetrics::invalidation_failed();
            }
        }
    }
}
