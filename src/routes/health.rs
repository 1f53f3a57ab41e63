use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use crate::db;
use crate::error::ApiError;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
}

// GET /health - Store round trip
pub async fn health_check(State(pool): State<SqlitePool>) -> Result<Json<HealthResponse>, ApiError> {
    db::ping(&pool).await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    }))
}
