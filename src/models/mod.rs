use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod rating;
pub mod user;

pub use rating::{RatedGame, Rating, ScorePair, SimilarityScore};
pub use user::{Gender, UserProfile};

/// Identifier of a site user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i32);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a game in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub i32);

impl Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog game as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub game_id: GameId,
    pub name: String,
    pub summary: Option<String>,
    pub release_year: Option<i32>,
}

impl Game {
    pub fn new(game_id: GameId, name: impl Into<String>) -> Self {
        Self {
            game_id,
            name: name.into(),
            summary: None,
            release_year: None,
        }
    }
}
