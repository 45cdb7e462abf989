//! Rating value object.

use crate::ReviewsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A star rating between [`Rating::MIN`] and [`Rating::MAX`] inclusive.
///
/// Construction always goes through [`Rating::new`], so a `Rating` held
/// anywhere in the system is in range. Zero is not a valid rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Creates a rating, rejecting values outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, ReviewsError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            // Range checked above
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(Self(value as u8))
        } else {
            Err(ReviewsError::validation(format!(
                "Rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Iterates all valid ratings in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<i64> for Rating {
    type Error = ReviewsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
