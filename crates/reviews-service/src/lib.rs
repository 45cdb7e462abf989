//! # Reviews Service
//!
//! Business logic for product reviews: cache-aside list reads, live
//! aggregates, and the mutations that invalidate cached lists.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod metrics;
pub mod review_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::*;
pub use review_service::*;
