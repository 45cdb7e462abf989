//! # Reviews REST
//!
//! REST API layer using Axum for the product reviews service.
//! Provides the review endpoints, health probes, metrics exposition and
//! the OpenAPI document.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
