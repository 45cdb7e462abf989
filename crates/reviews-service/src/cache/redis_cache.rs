//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use reviews_core::{ReviewsError, ReviewsResult};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Redis-based cache service.
///
/// Without a pool every read misses and every write is a no-op.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ReviewsResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                ReviewsError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(ReviewsError::Cache("Cache is disabled".to_string())),
        }
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> ReviewsResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            ReviewsError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ReviewsResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            ReviewsError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> ReviewsResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            ReviewsError::Cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }
}

/// Builds a Redis pool from a connection URL.
///
/// Connections are opened lazily on first checkout.
pub fn create_redis_pool(url: &str, pool_size: u32) -> ReviewsResult<Arc<Pool>> {
    let pool = deadpool_redis::Config::from_url(url)
        .builder()
        .map_err(|e| ReviewsError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(pool_size as usize)
        .runtime(deadpool_redis::Runtime::Tokio1)
        .build()
        .map_err(|e| ReviewsError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    Ok(Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_cache() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_cache_misses_and_ignores_writes() {
        let cache = RedisCacheService::disabled();

        cache
            .set_raw("reviews:p1", "[]", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get_raw("reviews:p1").await.unwrap(), None);
        assert!(!cache.delete("reviews:p1").await.unwrap());
    }

    #[test]
    fn test_pool_creation_is_lazy() {
        // No connection is opened until the first checkout.
        let pool = create_redis_pool("redis://127.0.0.1:1", 4).unwrap();
        assert_eq!(pool.status().max_size, 4);
    }
}
