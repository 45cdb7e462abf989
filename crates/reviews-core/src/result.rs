//! Result type aliases for the reviews service.

use crate::ReviewsError;

/// A specialized `Result` type for review operations.
pub type ReviewsResult<T> = Result<T, ReviewsError>;
