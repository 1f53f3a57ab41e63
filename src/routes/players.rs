use std::collections::HashMap;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    response::Json,
};
use sqlx::sqlite::SqlitePool;
use crate::db;
use crate::error::ApiError;
use crate::models::{
    MessageResponse, PlayerCreated, PlayerOption, PlayerPayload, PlayerWithTeams,
};

// GET /api/players - List all players with their active teams
pub async fn get_players(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<PlayerWithTeams>>, ApiError> {
    let players = db::get_all_players(&pool).await?;
    let memberships = db::get_active_memberships(&pool).await?;
    let teams = db::get_all_teams(&pool).await?;

    let team_names: HashMap<i64, &str> = teams
        .iter()
        .map(|t| (t.team_id, t.team_name.as_str()))
        .collect();

    let processed = players
        .into_iter()
        .map(|player| {
            let player_teams: Vec<&str> = memberships
                .iter()
                .filter(|m| m.player_id == player.player_id)
                .filter_map(|m| team_names.get(&m.team_id).copied())
                .collect();

            PlayerWithTeams {
                teams: if player_teams.is_empty() {
                    "No team".to_string()
                } else {
                    player_teams.join(", ")
                },
                team_count: player_teams.len(),
                player,
            }
        })
        .collect();

    Ok(Json(processed))
}

// GET /api/players/simple - Id and name for dropdowns
pub async fn get_players_simple(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<PlayerOption>>, ApiError> {
    let players = db::get_player_options(&pool).await?;

    Ok(Json(players))
}

// POST /api/players
pub async fn create_player(
    State(pool): State<SqlitePool>,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<Json<PlayerCreated>, ApiError> {
    let Json(payload) = payload?;
    let player = payload.validate()?;

    let player_id = db::insert_player(&pool, &player).await?;
    tracing::info!(player_id, "Player added");

    Ok(Json(PlayerCreated {
        player_id,
        message: "Player added successfully".to_string(),
    }))
}

// PUT /api/players/:id
pub async fn update_player(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(player_id) = path?;
    let Json(payload) = payload?;
    let player = payload.validate()?;

    db::update_player(&pool, player_id, &player).await?;

    Ok(Json(MessageResponse::new("Player updated successfully")))
}

// DELETE /api/players/:id - Captains can't be deleted
pub async fn delete_player(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(player_id) = path?;
    let captained = db::get_teams_captained_by(&pool, player_id).await?;
    if !captained.is_empty() {
        return Err(ApiError::bad_request("Cannot delete player who is captain of a team"));
    }

    db::delete_player(&pool, player_id).await?;
    tracing::info!(player_id, "Player deleted");

    Ok(Json(MessageResponse::new("Player deleted successfully")))
}
