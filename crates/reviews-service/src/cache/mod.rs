//! Caching infrastructure for the service layer.
//!
//! A key-value [`CacheInterface`] with a Redis implementation, and the
//! [`ReviewCache`] manager that applies cache-aside on top of it.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;
mod review_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::{create_redis_pool, RedisCacheService, RedisCacheServiceParameters};
pub use review_cache::{ReviewCache, ReviewCacheInterface, ReviewCacheParameters, DEFAULT_TTL};
