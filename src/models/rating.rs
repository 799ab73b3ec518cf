use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GameId, UserId};

/// A user's review score for one game
///
/// A user holds at most one rating per game; writers replace rather than append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub game_id: GameId,
    pub score: i32,
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(user_id: UserId, game_id: GameId, score: i32) -> Self {
        Self {
            user_id,
            game_id,
            score,
            comment: None,
            reviewed_at: Utc::now(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn rated_game(&self) -> RatedGame {
        RatedGame {
            game_id: self.game_id,
            score: self.score,
        }
    }
}

/// The `(game_id, score)` projection of a rating, as returned by the rating store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedGame {
    pub game_id: GameId,
    pub score: i32,
}

impl RatedGame {
    pub fn new(game_id: GameId, score: i32) -> Self {
        Self { game_id, score }
    }
}

/// Scores two users gave to the same game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePair {
    /// Score given by the user recommendations are computed for
    pub target: i32,
    /// Score given by the peer
    pub peer: i32,
}

impl ScorePair {
    pub fn new(target: i32, peer: i32) -> Self {
        Self { target, peer }
    }
}

impl From<ScorePair> for (f64, f64) {
    fn from(pair: ScorePair) -> Self {
        (f64::from(pair.target), f64::from(pair.peer))
    }
}

/// Taste similarity between the target user and one peer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityScore {
    pub user_id: UserId,
    /// Pearson correlation in [-1.0, 1.0]
    pub correlation: f64,
}
