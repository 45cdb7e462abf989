//! # Reviews Repository
//!
//! Document store access for the product reviews service.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ReviewRepository>
//! MySqlReviewRepository
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL (reviews, review_votes)
//! ```

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
