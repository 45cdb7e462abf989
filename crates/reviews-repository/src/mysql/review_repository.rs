//! MySQL review repository implementation.

use crate::{traits::ReviewRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reviews_core::{
    ProductId, Rating, Review, ReviewId, ReviewsError, ReviewsResult, UserId, VoteAction,
    VoteState, VoteTransition,
};
use shaku::Component;
use sqlx::FromRow;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const LIKE: &str = "like";
const DISLIKE: &str = "dislike";

/// MySQL review repository implementation.
///
/// Reviews live in `reviews`; the liked and disliked sets live in
/// `review_votes`, one row per voter. The counter columns are recomputed
/// from `review_votes` inside the same transaction as every vote. Reads take
/// both tables from one transaction snapshot, and the counters a read
/// returns are the sizes of the sets it returned.
#[derive(Component, Clone)]
#[shaku(interface = ReviewRepository)]
pub struct MySqlReviewRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlReviewRepository {
    /// Creates a new MySQL review repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Attaches vote rows to the reviews they belong to.
    fn assemble(rows: Vec<ReviewRow>, votes: Vec<VoteRow>) -> ReviewsResult<Vec<Review>> {
        let mut by_review: HashMap<String, Vec<VoteRow>> = HashMap::new();
        for vote in votes {
            by_review.entry(vote.review_id.clone()).or_default().push(vote);
        }

        rows.into_iter()
            .map(|row| {
                let votes = by_review.remove(&row.id).unwrap_or_default();
                row.into_review(votes)
            })
            .collect()
    }
}

/// Database row representation of a review.
#[derive(Debug, FromRow)]
struct ReviewRow {
    id: String, // CHAR(36)
    product_id: String,
    user_id: Option<String>,
    title: String,
    comment: String,
    rating: u8,
    is_deleted: bool,
    created_at: DateTime<Utc>,
}

/// One voter's entry in `review_votes`.
#[derive(Debug, FromRow)]
struct VoteRow {
    review_id: String,
    user_id: String,
    vote: String,
}

impl ReviewRow {
    fn into_review(self, votes: Vec<VoteRow>) -> ReviewsResult<Review> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| ReviewsError::Internal(format!("Invalid UUID in database: {}", e)))?;
        let rating = Rating::new(i64::from(self.rating))
            .map_err(|e| ReviewsError::Internal(format!("Invalid rating in database: {}", e)))?;

        let mut liked_users = BTreeSet::new();
        let mut disliked_users = BTreeSet::new();
        for vote in votes {
            match parse_vote(&vote.vote) {
                VoteState::Liked => liked_users.insert(UserId::new(vote.user_id)),
                VoteState::Disliked => disliked_users.insert(UserId::new(vote.user_id)),
                VoteState::Neutral => false,
            };
        }

        Ok(Review {
            id: ReviewId::from_uuid(id),
            product_id: ProductId::new(self.product_id),
            user_id: self.user_id.map(UserId::new),
            title: self.title,
            comment: self.comment,
            rating,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
            like_count: set_len(&liked_users),
            dislike_count: set_len(&disliked_users),
            liked_users,
            disliked_users,
        })
    }
}

fn set_len(users: &BTreeSet<UserId>) -> u32 {
    u32::try_from(users.len()).unwrap_or(u32::MAX)
}

fn parse_vote(s: &str) -> VoteState {
    match s {
        LIKE => VoteState::Liked,
        DISLIKE => VoteState::Disliked,
        _ => VoteState::Neutral,
    }
}

#[async_trait]
impl ReviewRepository for MySqlReviewRepository {
    async fn find_by_id(&self, id: ReviewId) -> ReviewsResult<Option<Review>> {
        debug!("Finding review by id: {}", id);

        let id_str = id.into_inner().to_string();
        let mut tx = self.pool.inner().begin().await?;

        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, product_id, user_id, title, comment, rating, is_deleted, created_at
            FROM reviews
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.commit().await?;
            return Ok(None);
        };

        let votes = sqlx::query_as::<_, VoteRow>(
            "SELECT review_id, user_id, vote FROM review_votes WHERE review_id = ?",
        )
        .bind(&id_str)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        row.into_review(votes).map(Some)
    }

    async fn find_by_product(
        &self,
        product_id: &ProductId,
        rating: Option<Rating>,
    ) -> ReviewsResult<Vec<Review>> {
        debug!(product_id = %product_id, rating = ?rating, "Finding reviews by product");

        // A NULL rating parameter disables the rating filter.
        let rating = rating.map(Rating::value);
        let mut tx = self.pool.inner().begin().await?;

        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, product_id, user_id, title, comment, rating, is_deleted, created_at
            FROM reviews
            WHERE product_id = ? AND is_deleted = FALSE AND (? IS NULL OR rating = ?)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(product_id.as_str())
        .bind(rating)
        .bind(rating)
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            tx.commit().await?;
            return Ok(Vec::new());
        }

        let votes = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT v.review_id, v.user_id, v.vote
            FROM review_votes v
            JOIN reviews r ON r.id = v.review_id
            WHERE r.product_id = ? AND r.is_deleted = FALSE AND (? IS NULL OR r.rating = ?)
            "#,
        )
        .bind(product_id.as_str())
        .bind(rating)
        .bind(rating)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Self::assemble(rows, votes)
    }

    async fn save(&self, review: &Review) -> ReviewsResult<()> {
        debug!("Saving new review for product: {}", review.product_id);

        let mut tx = self.pool.inner().begin().await?;
        let id_str = review.id.into_inner().to_string();

        sqlx::query(
            r#"
            INSERT INTO reviews (id, product_id, user_id, title, comment, rating,
                                 is_deleted, created_at, like_count, dislike_count)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(review.product_id.as_str())
        .bind(review.user_id.as_ref().map(UserId::as_str))
        .bind(&review.title)
        .bind(&review.comment)
        .bind(review.rating.value())
        .bind(review.is_deleted)
        .bind(review.created_at)
        .bind(review.like_count)
        .bind(review.dislike_count)
        .execute(&mut *tx)
        .await?;

        for (user, vote) in review
            .liked_users
            .iter()
            .map(|u| (u, LIKE))
            .chain(review.disliked_users.iter().map(|u| (u, DISLIKE)))
        {
            sqlx::query(
                "INSERT INTO review_votes (review_id, user_id, vote, voted_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&id_str)
            .bind(user.as_str())
            .bind(vote)
            .bind(review.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Review {} inserted", review.id);
        Ok(())
    }

    async fn apply_vote(
        &self,
        id: ReviewId,
        user: &UserId,
        action: VoteAction,
    ) -> ReviewsResult<VoteTransition> {
        debug!(review_id = %id, user_id = %user, action = %action, "Applying vote");

        let id_str = id.into_inner().to_string();
        let mut tx = self.pool.inner().begin().await?;

        // Row lock on the review serializes votes on it.
        let locked: Option<String> =
            sqlx::query_scalar("SELECT id FROM reviews WHERE id = ? FOR UPDATE")
                .bind(&id_str)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(ReviewsError::not_found("Review", id));
        }

        let current: Option<String> = sqlx::query_scalar(
            "SELECT vote FROM review_votes WHERE review_id = ? AND user_id = ?",
        )
        .bind(&id_str)
        .bind(user.as_str())
        .fetch_optional(&mut *tx)
        .await?;
        let current = current.as_deref().map_or(VoteState::Neutral, parse_vote);

        // Rejected transitions return here; dropping `tx` rolls back.
        let transition = action.transition(current)?;

        match transition.to {
            VoteState::Neutral => {
                sqlx::query("DELETE FROM review_votes WHERE review_id = ? AND user_id = ?")
                    .bind(&id_str)
                    .bind(user.as_str())
                    .execute(&mut *tx)
                    .await?;
            }
            VoteState::Liked | VoteState::Disliked => {
                let vote = if transition.to == VoteState::Liked { LIKE } else { DISLIKE };
                sqlx::query(
                    r#"
                    INSERT INTO review_votes (review_id, user_id, vote, voted_at)
                    VALUES (?, ?, ?, ?)
                    ON DUPLICATE KEY UPDATE vote = ?, voted_at = ?
                    "#,
                )
                .bind(&id_str)
                .bind(user.as_str())
                .bind(vote)
                .bind(Utc::now())
                .bind(vote)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(
            r#"
            UPDATE reviews
            SET like_count = (SELECT COUNT(*) FROM review_votes WHERE review_id = ? AND vote = 'like'),
                dislike_count = (SELECT COUNT(*) FROM review_votes WHERE review_id = ? AND vote = 'dislike')
            WHERE id = ?
            "#,
        )
        .bind(&id_str)
        .bind(&id_str)
        .bind(&id_str)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(review_id = %id, user_id = %user, from = %transition.from, to = %transition.to, "Vote applied");
        Ok(transition)
    }

    async fn soft_delete(&self, id: ReviewId) -> ReviewsResult<()> {
        debug!("Soft deleting review: {}", id);

        sqlx::query("UPDATE reviews SET is_deleted = TRUE WHERE id = ?")
            .bind(id.into_inner().to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }

    async fn average_rating(&self, product_id: &ProductId) -> ReviewsResult<Option<f64>> {
        debug!("Averaging ratings for product: {}", product_id);

        // AVG over integers yields DECIMAL; cast so it decodes as f64.
        let average: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT CAST(AVG(rating) AS DOUBLE)
            FROM reviews
            WHERE product_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(product_id.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(average)
    }

    async fn rating_counts(&self, product_id: &ProductId) -> ReviewsResult<Vec<(Rating, u64)>> {
        debug!("Counting ratings for product: {}", product_id);

        let rows: Vec<(u8, i64)> = sqlx::query_as(
            r#"
            SELECT rating, COUNT(*)
            FROM reviews
            WHERE product_id = ? AND is_deleted = FALSE
            GROUP BY rating
            ORDER BY rating
            "#,
        )
        .bind(product_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter()
            .map(|(rating, count)| {
                let rating = Rating::new(i64::from(rating)).map_err(|e| {
                    ReviewsError::Internal(format!("Invalid rating in database: {}", e))
                })?;
                Ok((rating, u64::try_from(count).unwrap_or_default()))
            })
            .collect()
    }
}

impl std::fmt::Debug for MySqlReviewRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlReviewRepository").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, rating: u8) -> ReviewRow {
        ReviewRow {
            id: id.to_string(),
            product_id: "p1".to_string(),
            user_id: None,
            title: "t".to_string(),
            comment: "c".to_string(),
            rating,
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    fn vote(review_id: &str, user: &str, vote: &str) -> VoteRow {
        VoteRow {
            review_id: review_id.to_string(),
            user_id: user.to_string(),
            vote: vote.to_string(),
        }
    }

    const ID_A: &str = "018f3a6e-7b1c-7cc0-9a4e-3f2b1d0c9e8a";
    const ID_B: &str = "018f3a6e-7b1c-7cc0-9a4e-3f2b1d0c9e8b";

    #[test]
    fn test_row_conversion_builds_vote_sets() {
        let review = row(ID_A, 4)
            .into_review(vec![vote(ID_A, "alice", LIKE), vote(ID_A, "bob", DISLIKE)])
            .unwrap();

        assert_eq!(review.id.to_string(), ID_A);
        assert_eq!(review.rating.value(), 4);
        assert!(review.liked_users.contains(&UserId::new("alice")));
        assert!(review.disliked_users.contains(&UserId::new("bob")));
        assert!(review.counters_consistent());
    }

    #[test]
    fn test_counters_follow_the_vote_rows_read() {
        let review = row(ID_A, 5)
            .into_review(vec![
                vote(ID_A, "alice", LIKE),
                vote(ID_A, "bob", LIKE),
                vote(ID_A, "carol", DISLIKE),
            ])
            .unwrap();
        assert_eq!(review.like_count, 2);
        assert_eq!(review.dislike_count, 1);

        let unvoted = row(ID_B, 5).into_review(vec![]).unwrap();
        assert_eq!(unvoted.like_count, 0);
        assert_eq!(unvoted.dislike_count, 0);
        assert!(unvoted.counters_consistent());
    }

    #[test]
    fn test_row_conversion_rejects_bad_uuid() {
        let err = row("not-a-uuid", 3).into_review(vec![]).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_row_conversion_rejects_bad_rating() {
        assert!(row(ID_A, 0).into_review(vec![]).is_err());
    }

    #[test]
    fn test_assemble_routes_votes_to_their_review() {
        let reviews = MySqlReviewRepository::assemble(
            vec![row(ID_A, 4), row(ID_B, 5)],
            vec![vote(ID_A, "alice", LIKE), vote(ID_A, "bob", DISLIKE)],
        )
        .unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].liked_users.len(), 1);
        assert!(reviews[1].liked_users.is_empty());
        assert!(reviews[1].disliked_users.is_empty());
    }

    #[test]
    fn test_parse_vote() {
        assert_eq!(parse_vote("like"), VoteState::Liked);
        assert_eq!(parse_vote("dislike"), VoteState::Disliked);
        assert_eq!(parse_vote("other"), VoteState::Neutral);
    }
}
