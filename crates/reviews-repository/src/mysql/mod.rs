//! MySQL repository implementations.

mod review_repository;

pub use review_repository::*;
