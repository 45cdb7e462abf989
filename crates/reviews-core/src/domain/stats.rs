//! Rating aggregates computed from the live store.

use super::Rating;
use serde::{Deserialize, Serialize};

/// Count and share of one star rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingBucket {
    pub rating: u8,
    pub count: u64,
    /// Percentage of all reviews, rounded to two decimals.
    pub percent: f64,
}

/// Per-rating breakdown of a product's non-deleted reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingDistribution {
    pub total_reviews: u64,
    /// One bucket per rating, 1 through 5, in ascending order.
    pub distribution: Vec<RatingBucket>,
}

impl RatingDistribution {
    /// Builds the distribution from grouped counts.
    ///
    /// Ratings missing from `counts` get a zero bucket. Every percent is 0
    /// when there are no reviews.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(counts: &[(Rating, u64)]) -> Self {
        let total_reviews: u64 = counts.iter().map(|(_, count)| count).sum();

        let distribution = Rating::all()
            .map(|rating| {
                let count = counts
                    .iter()
                    .filter(|(r, _)| *r == rating)
                    .map(|(_, c)| c)
                    .sum();
                let percent = if total_reviews > 0 {
                    round2(count as f64 / total_reviews as f64 * 100.0)
                } else {
                    0.0
                };
                RatingBucket {
                    rating: rating.value(),
                    count,
                    percent,
                }
            })
            .collect();

        Self {
            total_reviews,
            distribution,
        }
    }

    /// Returns the bucket for `rating`.
    #[must_use]
    pub fn bucket(&self, rating: Rating) -> Option<&RatingBucket> {
        self.distribution.iter().find(|b| b.rating == rating.value())
    }
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(value: i64) -> Rating {
        Rating::new(value).unwrap()
    }

    #[test]
    fn test_distribution_percentages() {
        let stats = RatingDistribution::from_counts(&[(r(3), 3), (r(4), 1), (r(5), 2)]);

        assert_eq!(stats.total_reviews, 6);
        assert_eq!(stats.distribution.len(), 5);
        assert_eq!(stats.bucket(r(3)).unwrap().percent, 50.0);
        assert_eq!(stats.bucket(r(5)).unwrap().percent, 33.33);
        assert_eq!(stats.bucket(r(4)).unwrap().percent, 16.67);
        assert_eq!(stats.bucket(r(1)).unwrap().percent, 0.0);
        assert_eq!(stats.bucket(r(2)).unwrap().count, 0);
    }

    #[test]
    fn test_distribution_is_ascending() {
        let stats = RatingDistribution::from_counts(&[(r(5), 1), (r(1), 1)]);
        let ratings: Vec<u8> = stats.distribution.iter().map(|b| b.rating).collect();
        assert_eq!(ratings, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_distribution() {
        let stats = RatingDistribution::from_counts(&[]);
        assert_eq!(stats.total_reviews, 0);
        assert!(stats.distribution.iter().all(|b| b.count == 0 && b.percent == 0.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(23.0 / 6.0), 3.83);
        assert_eq!(round2(4.0), 4.0);
        assert_eq!(round2(0.0), 0.0);
    }
}
