use std::collections::HashMap;

use crate::{
    db::{GameCatalog, RatingStore},
    error::AppResult,
    models::{Game, GameId, RatedGame, Rating, UserId, UserProfile},
    services::cohort::CohortQuery,
};

/// Rating store and game catalog held entirely in memory
///
/// Built up front with the `with_*` methods, then shared read-only. Users and
/// ratings keep insertion order, which is the order queries return them in.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: Vec<UserProfile>,
    ratings: Vec<Rating>,
    games: HashMap<GameId, Game>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user, replacing any profile with the same id
    pub fn with_user(mut self, profile: UserProfile) -> Self {
        match self.users.iter_mut().find(|u| u.user_id == profile.user_id) {
            Some(existing) => *existing = profile,
            None => self.users.push(profile),
        }
        self
    }

    /// Adds a rating; a second rating of the same game by the same user
    /// replaces the first in place
    pub fn with_rating(mut self, rating: Rating) -> Self {
        match self
            .ratings
            .iter_mut()
            .find(|r| r.user_id == rating.user_id && r.game_id == rating.game_id)
        {
            Some(existing) => *existing = rating,
            None => self.ratings.push(rating),
        }
        self
    }

    pub fn with_game(mut self, game: Game) -> Self {
        self.games.insert(game.game_id, game);
        self
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }
}

#[async_trait::async_trait]
impl RatingStore for InMemoryStore {
    async fn get_user_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn get_ratings_for_user(&self, user_id: UserId) -> AppResult<Vec<RatedGame>> {
        Ok(self
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(Rating::rated_game)
            .collect())
    }

    async fn get_cohort_candidates(&self, query: &CohortQuery) -> AppResult<Vec<UserProfile>> {
        Ok(self
            .users
            .iter()
            .filter(|u| query.matches(u))
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait::async_trait]
impl GameCatalog for InMemoryStore {
    async fn get_games(&self, game_ids: &[GameId]) -> AppResult<Vec<Game>> {
        Ok(game_ids
            .iter()
            .filter_map(|id| self.games.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use tokio_test::block_on;

    #[test]
    fn test_rating_upsert_replaces_score() {
        let store = InMemoryStore::new()
            .with_rating(Rating::new(UserId(1), GameId(1), 40))
            .with_rating(Rating::new(UserId(1), GameId(2), 60))
            .with_rating(Rating::new(UserId(1), GameId(1), 85).with_comment("grew on me"));

        assert_eq!(store.ratings().len(), 2);

        let ratings = block_on(store.get_ratings_for_user(UserId(1))).unwrap();
        assert_eq!(
            ratings,
            vec![RatedGame::new(GameId(1), 85), RatedGame::new(GameId(2), 60)]
        );
        assert_eq!(store.ratings()[0].comment.as_deref(), Some("grew on me"));
    }

    #[test]
    fn test_user_upsert_replaces_profile() {
        let store = InMemoryStore::new()
            .with_user(UserProfile::new(UserId(1), 20, Gender::F))
            .with_user(UserProfile::new(UserId(1), 21, Gender::F));

        let profile = block_on(store.get_user_profile(UserId(1))).unwrap().unwrap();
        assert_eq!(profile.age, 21);
    }

    #[test]
    fn test_batch_ratings_include_users_without_ratings() {
        let store = InMemoryStore::new().with_rating(Rating::new(UserId(2), GameId(3), 70));

        let ratings = block_on(store.get_ratings_for_users(&[UserId(2), UserId(5)])).unwrap();
        assert_eq!(ratings[&UserId(2)], vec![RatedGame::new(GameId(3), 70)]);
        assert!(ratings[&UserId(5)].is_empty());
    }

    #[test]
    fn test_get_games_keeps_requested_order_and_skips_unknown() {
        let store = InMemoryStore::new()
            .with_game(Game::new(GameId(1), "Testo"))
            .with_game(Game::new(GameId(2), "Testo 2"));

        let games = block_on(store.get_games(&[GameId(2), GameId(9), GameId(1)])).unwrap();
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Testo 2", "Testo"]);
    }
}
