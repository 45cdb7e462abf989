//! # Reviews Core
//!
//! Core types, traits, and error definitions for the product reviews service.
//! This crate provides the domain model (reviews, ratings, votes) and the
//! foundational abstractions used across all layers.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
