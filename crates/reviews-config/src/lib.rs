//! # Reviews Config
//!
//! Configuration for the product reviews service, layered from TOML files
//! and `REVIEWS__*` environment variables, validated before startup.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
