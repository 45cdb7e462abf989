//! REST API controllers.

pub mod health_controller;
pub mod metrics_controller;
pub mod review_controller;

pub use health_controller::*;
