//! Dependency injection module using Shaku.
//!
//! [`ReviewsModule`] wires the whole service into one process: the MySQL
//! pool and review store, the Redis cache behind the review list cache, and
//! the review service on top.

use reviews_config::{AppConfig, CacheConfig};
use reviews_core::ReviewsResult;
use reviews_repository::{DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlReviewRepository};
use reviews_service::{
    create_redis_pool, RedisCacheService, RedisCacheServiceParameters, ReviewCache,
    ReviewCacheParameters, ReviewServiceComponent,
};
use shaku::module;
use sqlx::mysql::MySqlPool;
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Shaku Module Definition
// ============================================================================

module! {
    pub ReviewsModule {
        components = [
            DatabasePool,
            MySqlReviewRepository,
            RedisCacheService,
            ReviewCache,
            ReviewServiceComponent,
        ],
        providers = [],
    }
}

// ============================================================================
// Module Builders
// ============================================================================

/// Connects the database and Redis pools and builds the module.
pub async fn build_reviews_module(config: &AppConfig) -> ReviewsResult<Arc<ReviewsModule>> {
    let db_pool = DatabasePool::new(&config.database).await?;

    let cache_pool = if config.redis.enabled {
        let pool = create_redis_pool(&config.redis.url, config.redis.pool_size)?;
        info!(pool_size = config.redis.pool_size, "Redis cache enabled");
        Some(pool)
    } else {
        warn!("Redis disabled, every review list read goes to the database");
        None
    };

    Ok(build_module_with(
        db_pool.inner().clone(),
        cache_pool,
        &config.cache,
    ))
}

/// Builds the module from already created pools.
///
/// A `None` cache pool yields a cache that never hits.
pub fn build_module_with(
    db_pool: MySqlPool,
    cache_pool: Option<Arc<deadpool_redis::Pool>>,
    cache: &CacheConfig,
) -> Arc<ReviewsModule> {
    let module = ReviewsModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool: db_pool })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
        })
        .with_component_parameters::<ReviewCache>(ReviewCacheParameters {
            ttl: cache.ttl(),
            key_prefix: cache.key_prefix.clone(),
        })
        .build();

    Arc::new(module)
}

/// Resolves the database pool so startup can migrate and shutdown can close it.
#[must_use]
pub fn database(module: &ReviewsModule) -> Arc<dyn DatabasePoolInterface> {
    shaku::HasComponent::<dyn DatabasePoolInterface>::resolve(module)
}
