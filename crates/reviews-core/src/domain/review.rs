//! Review entity.

use super::{Rating, VoteState, VoteTransition};
use crate::{ProductId, ReviewId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A product review together with its vote bookkeeping.
///
/// The field names on the wire are fixed by existing clients and by the
/// payloads already sitting in the cache, hence the explicit renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Review {
    /// Store-assigned identifier, immutable once created.
    #[serde(rename = "_id")]
    pub id: ReviewId,

    /// Product the review belongs to.
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,

    /// Author of the review, when supplied.
    #[serde(rename = "UserID", default)]
    pub user_id: Option<UserId>,

    #[serde(rename = "Title", default)]
    pub title: String,

    #[serde(rename = "Comment", default)]
    pub comment: String,

    #[serde(rename = "Rating")]
    pub rating: Rating,

    /// Soft-delete flag. Deleted reviews stay in the store.
    #[serde(rename = "isDeleted", default)]
    pub is_deleted: bool,

    /// Creation timestamp, serialized as ISO-8601.
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,

    /// Number of likes. Always equals `liked_users.len()`.
    #[serde(rename = "likeViews", default)]
    pub like_count: u32,

    /// Number of dislikes. Always equals `disliked_users.len()`.
    #[serde(rename = "DislikeView", default)]
    pub dislike_count: u32,

    #[serde(rename = "likedUsers", default)]
    pub liked_users: BTreeSet<UserId>,

    #[serde(rename = "dislikedUsers", default)]
    pub disliked_users: BTreeSet<UserId>,
}

impl Review {
    /// Creates a fresh review: not deleted, no votes, stamped now.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        rating: Rating,
        user_id: Option<UserId>,
        title: String,
        comment: String,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            product_id,
            user_id,
            title,
            comment,
            rating,
            is_deleted: false,
            created_at: Utc::now(),
            like_count: 0,
            dislike_count: 0,
            liked_users: BTreeSet::new(),
            disliked_users: BTreeSet::new(),
        }
    }

    /// Returns where `user` currently stands towards this review.
    #[must_use]
    pub fn vote_state(&self, user: &UserId) -> VoteState {
        if self.liked_users.contains(user) {
            VoteState::Liked
        } else if self.disliked_users.contains(user) {
            VoteState::Disliked
        } else {
            VoteState::Neutral
        }
    }

    /// Applies an accepted transition for `user`.
    ///
    /// The user is removed from both sets before being placed in the target
    /// set, and the counters are re-derived from the sets afterwards.
    pub fn record_vote(&mut self, user: &UserId, transition: VoteTransition) {
        self.liked_users.remove(user);
        self.disliked_users.remove(user);

        match transition.to {
            VoteState::Liked => {
                self.liked_users.insert(user.clone());
            }
            VoteState::Disliked => {
                self.disliked_users.insert(user.clone());
            }
            VoteState::Neutral => {}
        }

        self.sync_counters();
    }

    /// Marks the review deleted. Votes and counters are left untouched.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Checks that both counters match their sets and the sets are disjoint.
    #[must_use]
    pub fn counters_consistent(&self) -> bool {
        self.like_count as usize == self.liked_users.len()
            && self.dislike_count as usize == self.disliked_users.len()
            && self.liked_users.is_disjoint(&self.disliked_users)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn sync_counters(&mut self) {
        self.like_count = self.liked_users.len() as u32;
        self.dislike_count = self.disliked_users.len() as u32;
    }
}
