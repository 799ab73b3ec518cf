use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::collections::HashSet;

use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Game, GameId, SimilarityScore, UserId},
};

use super::AppState;

// Response types

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub user_id: UserId,
    /// `null` when no similar users exist
    pub recommendations: Option<Vec<Game>>,
}

#[derive(Debug, Serialize)]
pub struct SimilarUsersResponse {
    pub user_id: UserId,
    pub similar_users: Option<Vec<SimilarityScore>>,
}

fn parse_user_id(raw: &str) -> AppResult<UserId> {
    raw.parse::<i32>()
        .map(UserId)
        .map_err(|_| AppError::InvalidInput(format!("invalid user id: {}", raw)))
}

/// Requested ids the catalog returned no game for, in request order
fn missing_game_ids(requested: &[GameId], found: &[Game]) -> Vec<GameId> {
    let found: HashSet<GameId> = found.iter().map(|game| game.game_id).collect();
    requested
        .iter()
        .copied()
        .filter(|game_id| !found.contains(game_id))
        .collect()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Games recommended to a user by their most similar peers
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RecommendationsResponse>> {
    let user_id = parse_user_id(&user_id)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        "Processing recommendation request"
    );

    let recommendations = match state.engine.recommend(user_id).await? {
        Some(game_ids) => {
            let games = state.catalog.get_games(&game_ids).await?;
            let missing = missing_game_ids(&game_ids, &games);
            if !missing.is_empty() {
                tracing::warn!(
                    request_id = %request_id,
                    missing = ?missing,
                    "Recommended games missing from catalog"
                );
            }
            Some(games)
        }
        None => None,
    };

    tracing::info!(
        request_id = %request_id,
        count = recommendations.as_ref().map_or(0, Vec::len),
        "Recommendations completed"
    );

    Ok(Json(RecommendationsResponse {
        user_id,
        recommendations,
    }))
}

/// A user's most similar peers with their correlation scores
pub async fn get_similar_users(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> AppResult<Json<SimilarUsersResponse>> {
    let user_id = parse_user_id(&user_id)?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        "Processing similar users request"
    );

    let similar_users = state.engine.similar_users(user_id).await?;

    Ok(Json(SimilarUsersResponse {
        user_id,
        similar_users,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("12").unwrap(), UserId(12));
        assert!(matches!(
            parse_user_id("abc"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_game_ids_keeps_request_order() {
        let requested = [GameId(4), GameId(7), GameId(5), GameId(6)];
        let found = [Game::new(GameId(5), "Hades"), Game::new(GameId(4), "Celeste")];

        assert_eq!(missing_game_ids(&requested, &found), vec![GameId(7), GameId(6)]);
        assert!(missing_game_ids(&requested[..1], &found).is_empty());
    }
}
