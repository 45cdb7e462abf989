//! Data Transfer Objects (DTOs).

mod review_dto;

pub use review_dto::*;
