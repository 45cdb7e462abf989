//! Prometheus metrics for the review cache.
//!
//! Cache failures never reach the caller, so these counters are the only
//! place they show up besides the logs.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metric names for the review cache.
pub mod names {
    /// Reads answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "reviews_cache_hits_total";
    /// Reads that fell through to the store.
    pub const CACHE_MISSES_TOTAL: &str = "reviews_cache_misses_total";
    /// Cache reads that failed and were treated as misses.
    pub const CACHE_READ_FAILURES_TOTAL: &str = "reviews_cache_read_failures_total";
    /// Cache writes that failed after a miss.
    pub const CACHE_POPULATE_FAILURES_TOTAL: &str = "reviews_cache_populate_failures_total";
    /// Successful invalidations.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "reviews_cache_invalidations_total";
    /// Invalidations that failed after a committed mutation.
    pub const CACHE_INVALIDATION_FAILURES_TOTAL: &str = "reviews_cache_invalidation_failures_total";

    /// Store list query duration in seconds.
    pub const STORE_LIST_DURATION_SECONDS: &str = "reviews_store_list_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of review list reads served from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of review list reads that missed the cache"
    );
    describe_counter!(
        names::CACHE_READ_FAILURES_TOTAL,
        "Total number of cache reads that failed and were treated as misses"
    );
    describe_counter!(
        names::CACHE_POPULATE_FAILURES_TOTAL,
        "Total number of cache populations that failed"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of cache invalidations"
    );
    describe_counter!(
        names::CACHE_INVALIDATION_FAILURES_TOTAL,
        "Total number of cache invalidations that failed"
    );

    describe_histogram!(
        names::STORE_LIST_DURATION_SECONDS,
        "Review list query duration in seconds"
    );
}

/// Review cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache hit.
    pub fn hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    /// Record a cache miss.
    pub fn miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record a failed cache read.
    pub fn read_failed() {
        counter!(names::CACHE_READ_FAILURES_TOTAL).increment(1);
    }

    /// Record a failed cache population.
    pub fn populate_failed() {
        counter!(names::CACHE_POPULATE_FAILURES_TOTAL).increment(1);
    }

    /// Record a successful invalidation.
    pub fn invalidated() {
        counter!(names::CACHE_INVALIDATIONS_TOTAL).increment(1);
    }

    /// Record a failed invalidation.
    pub fn invalidation_failed() {
        counter!(names::CACHE_INVALIDATION_FAILURES_TOTAL).increment(1);
    }

    /// Record the duration of a store list query.
    pub fn store_list(duration: Duration, filtered: bool) {
        histogram!(
            names::STORE_LIST_DURATION_SECONDS,
            "filtered" => if filtered { "true" } else { "false" }
        )
        .record(duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_names_follow_prometheus_convention() {
        for name in [
            names::CACHE_HITS_TOTAL,
            names::CACHE_MISSES_TOTAL,
            names::CACHE_READ_FAILURES_TOTAL,
            names::CACHE_POPULATE_FAILURES_TOTAL,
            names::CACHE_INVALIDATIONS_TOTAL,
            names::CACHE_INVALIDATION_FAILURES_TOTAL,
        ] {
            assert!(name.starts_with("reviews_cache_"));
            assert!(name.ends_with("_total"));
        }
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        register_metrics();
        CacheMetrics::hit();
        CacheMetrics::invalidation_failed();
        CacheMetrics::store_list(Duration::from_millis(5), true);
    }
}
