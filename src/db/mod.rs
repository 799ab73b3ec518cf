use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{Game, GameId, RatedGame, UserId, UserProfile},
    services::cohort::CohortQuery,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{create_pool, run_migrations, PgStore};

/// Read-only access to user profiles and their game ratings
///
/// The recommendation engine only ever reads through this trait. Implementations
/// report unreachable or malformed data as errors; they must not substitute
/// defaults.
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// Profile of a single user, `None` if the user does not exist
    async fn get_user_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;

    /// Every `(game_id, score)` the user rated, in the store's natural order
    async fn get_ratings_for_user(&self, user_id: UserId) -> AppResult<Vec<RatedGame>>;

    /// Users matching the cohort filter
    async fn get_cohort_candidates(&self, query: &CohortQuery) -> AppResult<Vec<UserProfile>>;

    /// Ratings for several users at once
    ///
    /// Default implementation issues one `get_ratings_for_user` per id. Stores
    /// with a bulk query should override it. Users without ratings map to an
    /// empty list.
    async fn get_ratings_for_users(
        &self,
        user_ids: &[UserId],
    ) -> AppResult<HashMap<UserId, Vec<RatedGame>>> {
        let mut ratings = HashMap::with_capacity(user_ids.len());
        for &user_id in user_ids {
            ratings.insert(user_id, self.get_ratings_for_user(user_id).await?);
        }
        Ok(ratings)
    }

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Lookup of game details for ids produced by the engine
#[async_trait::async_trait]
pub trait GameCatalog: Send + Sync {
    /// Games for `game_ids`, in the same order; unknown ids are skipped
    async fn get_games(&self, game_ids: &[GameId]) -> AppResult<Vec<Game>>;
}
