#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePool;
use tower::ServiceExt; // For `oneshot` method
use tournament_api::create_router;
use tournament_api::db::{self, DatabaseConfig};

/// Fresh in-memory store with the schema applied, and the app on top of it.
pub async fn test_app() -> (Router, SqlitePool) {
    let config = DatabaseConfig {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };

    let pool = db::connect(&config)
        .await
        .expect("Failed to create test database");

    let public_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("public");

    (create_router(pool.clone(), public_dir), pool)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

pub async fn create_player(app: &Router, name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/api/players",
        json!({
            "player_name": name,
            "age": 20,
            "username": name.to_lowercase(),
            "email": format!("{}@example.com", name.to_lowercase()),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["player_id"].as_i64().unwrap()
}

pub async fn create_team(app: &Router, name: &str, captain_id: i64) -> i64 {
    let (status, body) = post(
        app,
        "/api/teams",
        json!({ "team_name": name, "captain_id": captain_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["team_id"].as_i64().unwrap()
}

pub async fn create_tournament(app: &Router, name: &str, start_date: &str) -> i64 {
    let (status, body) = post(
        app,
        "/api/tournaments",
        json!({ "tour_name": name, "start_date": start_date, "end_date": start_date }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["tour_id"].as_i64().unwrap()
}

pub async fn create_match(app: &Router, tournament_id: i64, team1_id: i64, team2_id: i64) -> i64 {
    let (status, body) = post(
        app,
        "/api/matches",
        json!({
            "tournament_id": tournament_id,
            "round": "Group A",
            "scheduled_at": "2025-06-01T18:00:00",
            "team1_id": team1_id,
            "team2_id": team2_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["match_id"].as_i64().unwrap()
}

pub fn find<'a>(rows: &'a Value, key: &str, id: i64) -> &'a Value {
    rows.as_array()
        .unwrap()
        .iter()
        .find(|row| row[key].as_i64() == Some(id))
        .unwrap_or_else(|| panic!("no row with {key} = {id}"))
}
