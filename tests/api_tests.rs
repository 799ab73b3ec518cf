use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use exp_reviews::api::{create_router, AppState};
use exp_reviews::db::InMemoryStore;
use exp_reviews::models::{Game, GameId, Gender, Rating, UserId, UserProfile};

fn user(id: i32, age: u32, gender: Gender) -> UserProfile {
    UserProfile::new(UserId(id), age, gender)
}

fn rating(user_id: i32, game_id: i32, score: i32) -> Rating {
    Rating::new(UserId(user_id), GameId(game_id), score)
}

/// A (1, 35) and B (2, 32) rate games 1-3 identically; C (3, 30) shares
/// nothing with A. D is outside the age window and E has another gender.
fn example_data() -> InMemoryStore {
    let mut store = InMemoryStore::new()
        .with_user(user(1, 35, Gender::F))
        .with_user(user(2, 32, Gender::F))
        .with_user(user(3, 30, Gender::F))
        .with_user(user(4, 41, Gender::F))
        .with_user(user(5, 35, Gender::M))
        .with_user(user(6, 67, Gender::Tm));

    for game_id in 1..=9 {
        store = store.with_game(Game::new(GameId(game_id), format!("Testo {}", game_id)));
    }

    store
        .with_rating(rating(1, 1, 90))
        .with_rating(rating(1, 2, 60))
        .with_rating(rating(1, 3, 30))
        .with_rating(rating(2, 1, 90))
        .with_rating(rating(2, 2, 60))
        .with_rating(rating(2, 3, 30))
        .with_rating(rating(2, 4, 85))
        .with_rating(rating(2, 7, 75).with_comment("underrated"))
        .with_rating(rating(3, 5, 80))
        .with_rating(rating(3, 6, 70))
        .with_rating(rating(4, 8, 100))
        .with_rating(rating(5, 9, 100))
}

fn create_test_server() -> TestServer {
    let state = AppState::in_memory(example_data());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_similar_users_ranks_identical_taste_first() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/1/similar").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_id"], 1);
    assert_eq!(
        body["similar_users"],
        json!([
            { "user_id": 2, "correlation": 1.0 },
            { "user_id": 3, "correlation": 0.0 }
        ])
    );
}

#[tokio::test]
async fn test_recommendations_end_to_end() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/1/recommendations").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let ids: Vec<i64> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|game| game["game_id"].as_i64().unwrap())
        .collect();

    // B's picks first, then C's; nothing A already rated, nothing from D or E
    assert_eq!(ids, vec![4, 7, 5, 6]);
    assert_eq!(body["recommendations"][0]["name"], "Testo 4");
}

#[tokio::test]
async fn test_recommendations_without_cohort_are_null() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/6/recommendations").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_id"], 6);
    assert!(body["recommendations"].is_null());
}

#[tokio::test]
async fn test_similar_users_without_cohort_are_null() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/6/similar").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["similar_users"].is_null());
}

#[tokio::test]
async fn test_recommendations_null_when_cohort_shares_no_games() {
    let server = create_test_server();

    // users 1 and 2 are in user 3's cohort but rated none of 3's games
    let response = server.get("/api/v1/users/3/recommendations").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_id"], 3);
    assert!(body["recommendations"].is_null());
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/999/recommendations").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_invalid_user_id_is_bad_request() {
    let server = create_test_server();

    let response = server.get("/api/v1/users/abc/similar").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
