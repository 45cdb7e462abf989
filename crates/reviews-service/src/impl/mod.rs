//! Review service implementations.
//!
//! Trait definitions live in the parent module (`review_service.rs`).

pub mod review_service_impl;

pub use review_service_impl::ReviewServiceComponent;
