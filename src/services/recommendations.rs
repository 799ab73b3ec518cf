use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::instrument;

use crate::{
    db::RatingStore,
    error::{AppError, AppResult},
    models::{GameId, RatedGame, SimilarityScore, UserId, UserProfile},
    services::{cohort::select_cohort, matching::build_matches, ranking::rank},
};

/// Tunables for peer recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Most similar peers consulted per request
    pub similar_user_limit: usize,
    /// Top-rated games taken from each consulted peer
    pub games_per_peer: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            similar_user_limit: 5,
            games_per_peer: 4,
        }
    }
}

/// Merges the best-rated games of each similar peer into one recommendation list.
///
/// Returns `None` when there are no similar peers. Otherwise each peer (in rank
/// order) contributes its `games_per_peer` highest scores, ties broken by the
/// order the store listed them; duplicates and games in `already_rated` are
/// dropped. Survivors keep first-seen order, which callers should treat as
/// unspecified.
pub fn aggregate(
    similar_users: &[UserId],
    already_rated: &HashSet<GameId>,
    ratings_by_user: &HashMap<UserId, Vec<RatedGame>>,
    games_per_peer: usize,
) -> Option<Vec<GameId>> {
    if similar_users.is_empty() {
        return None;
    }

    let mut seen = HashSet::new();
    let mut recommended = Vec::new();

    for user_id in similar_users {
        let Some(ratings) = ratings_by_user.get(user_id) else {
            continue;
        };

        for game_id in top_rated(ratings, games_per_peer) {
            if seen.insert(game_id) && !already_rated.contains(&game_id) {
                recommended.push(game_id);
            }
        }
    }

    Some(recommended)
}

/// Highest scores first, stable for equal scores
fn top_rated(ratings: &[RatedGame], limit: usize) -> Vec<GameId> {
    let mut sorted: Vec<&RatedGame> = ratings.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted.into_iter().take(limit).map(|r| r.game_id).collect()
}

/// Peer-based game recommendations for one user at a time
///
/// Every call reads fresh data from the store and keeps nothing between calls.
#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<dyn RatingStore>,
    settings: EngineSettings,
}

/// Everything one recommendation request needs from the store
struct PeerData {
    target_ratings: Vec<RatedGame>,
    cohort: Vec<UserId>,
    ratings_by_user: HashMap<UserId, Vec<RatedGame>>,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn RatingStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    /// Games rated highly by the users most similar to `user_id`.
    ///
    /// `Ok(None)` means no peer shares a rated game with the user; an unknown
    /// user is `NotFound`.
    #[instrument(skip(self))]
    pub async fn recommend(&self, user_id: UserId) -> AppResult<Option<Vec<GameId>>> {
        let target = self.load_profile(user_id).await?;
        let data = self.load_peer_data(&target).await?;

        let Some(similar) = self.rank_peers(&data) else {
            tracing::info!("No similar users found, skipping recommendations");
            return Ok(None);
        };

        let similar_ids: Vec<UserId> = similar.iter().map(|s| s.user_id).collect();
        let already_rated: HashSet<GameId> =
            data.target_ratings.iter().map(|r| r.game_id).collect();

        let recommended = aggregate(
            &similar_ids,
            &already_rated,
            &data.ratings_by_user,
            self.settings.games_per_peer,
        );

        tracing::info!(
            similar_users = similar_ids.len(),
            recommended = recommended.as_ref().map_or(0, Vec::len),
            "Recommendations computed"
        );

        Ok(recommended)
    }

    /// The most similar peers of `user_id` with their correlations.
    ///
    /// `Ok(None)` means the cohort was empty or nobody in it rated a game the
    /// user also rated.
    #[instrument(skip(self))]
    pub async fn similar_users(&self, user_id: UserId) -> AppResult<Option<Vec<SimilarityScore>>> {
        let target = self.load_profile(user_id).await?;
        let data = self.load_peer_data(&target).await?;
        Ok(self.rank_peers(&data))
    }

    async fn load_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.store
            .get_user_profile(user_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, store = self.store.name(), "Profile lookup failed");
                e
            })?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))
    }

    async fn load_peer_data(&self, target: &UserProfile) -> AppResult<PeerData> {
        let target_ratings = self.store.get_ratings_for_user(target.user_id).await?;
        let cohort = select_cohort(self.store.as_ref(), target).await?;

        let ratings_by_user = if cohort.is_empty() {
            HashMap::new()
        } else {
            self.store
                .get_ratings_for_users(&cohort)
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        store = self.store.name(),
                        cohort_size = cohort.len(),
                        "Cohort ratings lookup failed"
                    );
                    e
                })?
        };

        Ok(PeerData {
            target_ratings,
            cohort,
            ratings_by_user,
        })
    }

    fn rank_peers(&self, data: &PeerData) -> Option<Vec<SimilarityScore>> {
        let target_scores: HashMap<GameId, i32> = data
            .target_ratings
            .iter()
            .map(|r| (r.game_id, r.score))
            .collect();

        let matches = build_matches(&target_scores, &data.cohort, &data.ratings_by_user);
        let ranked = rank(&matches, self.settings.similar_user_limit)?;

        for score in &ranked {
            tracing::debug!(peer = %score.user_id, correlation = score.correlation, "Ranked peer");
        }

        Some(ranked)
    }
}
