//! Per-user vote state machine.
//!
//! Each user stands in exactly one [`VoteState`] towards a review. A
//! [`VoteAction`] either moves the user to a new state or is rejected,
//! in which case nothing is written.

use crate::{ReviewsError, ReviewsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's standing towards a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    /// The user has not voted.
    Neutral,
    /// The user is in the liked set.
    Liked,
    /// The user is in the disliked set.
    Disliked,
}

impl fmt::Display for VoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Liked => write!(f, "liked"),
            Self::Disliked => write!(f, "disliked"),
        }
    }
}

/// A vote request issued by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Like,
    Dislike,
    Unlike,
    Undislike,
}

impl VoteAction {
    /// Resolves the transition this action causes from `current`.
    ///
    /// Returns [`ReviewsError::InvalidTransition`] when the action does not
    /// apply, e.g. liking twice or unliking without a like.
    pub fn transition(self, current: VoteState) -> ReviewsResult<VoteTransition> {
        let to = match (self, current) {
            (Self::Like, VoteState::Liked) => {
                return Err(ReviewsError::invalid_transition("Already liked"))
            }
            (Self::Dislike, VoteState::Disliked) => {
                return Err(ReviewsError::invalid_transition("Already disliked"))
            }
            (Self::Like, _) => VoteState::Liked,
            (Self::Dislike, _) => VoteState::Disliked,
            (Self::Unlike, VoteState::Liked) | (Self::Undislike, VoteState::Disliked) => {
                VoteState::Neutral
            }
            (Self::Unlike, _) => return Err(ReviewsError::invalid_transition("Not liked yet")),
            (Self::Undislike, _) => {
                return Err(ReviewsError::invalid_transition("Not disliked yet"))
            }
        };

        Ok(VoteTransition { from: current, to })
    }

    /// Message reported to the client once the action has been applied.
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Like => "Liked",
            Self::Dislike => "Disliked",
            Self::Unlike => "Unliked",
            Self::Undislike => "Undisliked",
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Like => write!(f, "like"),
            Self::Dislike => write!(f, "dislike"),
            Self::Unlike => write!(f, "unlike"),
            Self::Undislike => write!(f, "undislike"),
        }
    }
}

/// An accepted move between two vote states.
///
/// `from` and `to` always differ. The store applies a transition as one
/// atomic write: leave the `from` set, join the `to` set, and move both
/// counters with the sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoteTransition {
    pub from: VoteState,
    pub to: VoteState,
}
