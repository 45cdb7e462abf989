//! # Reviews Server
//!
//! Wiring for the product reviews service: the dependency injection module,
//! metrics recorder installation and startup logging.

pub mod di;
pub mod startup;

pub use di::*;
pub use startup::*;
