//! Cache key generators for consistent key naming.

use reviews_core::ProductId;

/// Default namespace for review list entries.
pub const DEFAULT_PREFIX: &str = "reviews";

/// Key of the cached unfiltered review list of a product.
#[must_use]
pub fn review_list(prefix: &str, product_id: &ProductId) -> String {
    format!("{}:{}", prefix, product_id)
}
