//! # Review Domain
//!
//! Review records, the rating value object, the per-user vote state machine,
//! and rating statistics.

pub mod rating;
pub mod review;
pub mod stats;
pub mod vote;

pub use rating::*;
pub use review::*;
pub use stats::*;
pub use vote::*;
