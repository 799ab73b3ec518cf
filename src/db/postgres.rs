use std::collections::HashMap;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{GameCatalog, RatingStore},
    error::{AppError, AppResult},
    models::{Game, GameId, Gender, RatedGame, UserId, UserProfile},
    services::cohort::CohortQuery,
};

/// Connects a pool capped at `max_connections`
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    age: Option<i32>,
    gender: Option<String>,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let age = row
            .age
            .ok_or_else(|| AppError::DataAccess(format!("user {} has no age", row.user_id)))
            .and_then(|age| {
                u32::try_from(age).map_err(|_| {
                    AppError::DataAccess(format!("user {} has negative age {}", row.user_id, age))
                })
            })?;

        let gender = row
            .gender
            .as_deref()
            .ok_or_else(|| AppError::DataAccess(format!("user {} has no gender", row.user_id)))?
            .parse::<Gender>()
            .map_err(|e| AppError::DataAccess(format!("user {}: {}", row.user_id, e)))?;

        Ok(UserProfile::new(UserId(row.user_id), age, gender))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    user_id: i32,
    game_id: i32,
    score: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct GameRow {
    game_id: i32,
    name: String,
    summary: Option<String>,
    release_year: Option<i32>,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            game_id: GameId(row.game_id),
            name: row.name,
            summary: row.summary,
            release_year: row.release_year,
        }
    }
}

fn to_sql_age(age: u32) -> AppResult<i32> {
    i32::try_from(age).map_err(|_| AppError::InvalidInput(format!("age {} out of range", age)))
}

/// Rating store and game catalog backed by the site's PostgreSQL schema
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RatingStore for PgStore {
    async fn get_user_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, age, gender
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn get_ratings_for_user(&self, user_id: UserId) -> AppResult<Vec<RatedGame>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT user_id, game_id, score
            FROM reviews
            WHERE user_id = $1
            ORDER BY review_id
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RatedGame::new(GameId(row.game_id), row.score))
            .collect())
    }

    async fn get_cohort_candidates(&self, query: &CohortQuery) -> AppResult<Vec<UserProfile>> {
        let genders: Vec<String> = query
            .gender
            .storage_codes()
            .iter()
            .map(|code| code.to_string())
            .collect();

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, age, gender
            FROM users
            WHERE user_id <> $1
              AND gender = ANY($2)
              AND age BETWEEN $3 AND $4
            ORDER BY user_id
            "#,
        )
        .bind(query.excluding.0)
        .bind(&genders)
        .bind(to_sql_age(query.window.floor)?)
        .bind(to_sql_age(query.window.ceiling)?)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserProfile::try_from).collect()
    }

    async fn get_ratings_for_users(
        &self,
        user_ids: &[UserId],
    ) -> AppResult<HashMap<UserId, Vec<RatedGame>>> {
        let ids: Vec<i32> = user_ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT user_id, game_id, score
            FROM reviews
            WHERE user_id = ANY($1)
            ORDER BY review_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut ratings: HashMap<UserId, Vec<RatedGame>> =
            user_ids.iter().map(|&id| (id, Vec::new())).collect();
        for row in rows {
            ratings
                .entry(UserId(row.user_id))
                .or_default()
                .push(RatedGame::new(GameId(row.game_id), row.score));
        }

        Ok(ratings)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait::async_trait]
impl GameCatalog for PgStore {
    async fn get_games(&self, game_ids: &[GameId]) -> AppResult<Vec<Game>> {
        if game_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = game_ids.iter().map(|id| id.0).collect();

        let rows = sqlx::query_as::<_, GameRow>(
            r#"
            SELECT game_id, name, summary,
                   EXTRACT(YEAR FROM release_date)::INT AS release_year
            FROM games
            WHERE game_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<GameId, Game> = rows
            .into_iter()
            .map(|row| (GameId(row.game_id), Game::from(row)))
            .collect();

        Ok(game_ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
