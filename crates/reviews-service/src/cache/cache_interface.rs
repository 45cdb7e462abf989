//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use reviews_core::ReviewsResult;
use shaku::Interface;
use std::time::Duration;

/// Key-value cache with per-key expiry.
///
/// Values are JSON strings so the trait stays dyn-compatible; typed access
/// goes through [`CacheExt`].
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> ReviewsResult<Option<String>>;

    /// Set a raw JSON value, replacing any previous value and its TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ReviewsResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> ReviewsResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    ///
    /// A payload that fails to decode is reported as an error, not a miss.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> ReviewsResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> ReviewsResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
