use std::collections::HashMap;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    response::Json,
};
use sqlx::sqlite::SqlitePool;
use crate::db;
use crate::error::ApiError;
use crate::models::{
    MessageResponse, TournamentCreated, TournamentOption, TournamentPayload, TournamentWithDetails,
};
use crate::routes::or_empty;
use crate::stats::count_by;

// GET /api/tournaments - List all tournaments with organizer and participant count
pub async fn get_tournaments(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<TournamentWithDetails>>, ApiError> {
    let tournaments = db::get_all_tournaments(&pool).await?;
    let teams = db::get_team_options(&pool).await?;
    let participants = or_empty(db::get_tournament_participants(&pool).await, "tournament participants");

    let team_names: HashMap<i64, &str> = teams
        .iter()
        .map(|t| (t.team_id, t.team_name.as_str()))
        .collect();
    let participant_counts = count_by(participants.iter().map(|p| p.tournament_id));

    let processed = tournaments
        .into_iter()
        .map(|tournament| TournamentWithDetails {
            organizer_name: tournament
                .organizer_team_id
                .and_then(|id| team_names.get(&id))
                .map_or_else(|| "No Organizer".to_string(), |n| n.to_string()),
            participant_count: participant_counts.get(&tournament.tour_id).copied().unwrap_or(0),
            tournament,
        })
        .collect();

    Ok(Json(processed))
}

// GET /api/tournaments/simple - Id, name and season for dropdowns
pub async fn get_tournaments_simple(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<TournamentOption>>, ApiError> {
    let tournaments = db::get_tournament_options(&pool).await?;

    Ok(Json(tournaments))
}

// POST /api/tournaments - max_participants defaults to 16
pub async fn create_tournament(
    State(pool): State<SqlitePool>,
    payload: Result<Json<TournamentPayload>, JsonRejection>,
) -> Result<Json<TournamentCreated>, ApiError> {
    let Json(payload) = payload?;
    let tournament = payload.validate()?;

    let tour_id = db::insert_tournament(&pool, &tournament).await?;
    tracing::info!(tour_id, "Tournament created");

    Ok(Json(TournamentCreated {
        tour_id,
        message: "Tournament created successfully".to_string(),
    }))
}

// PUT /api/tournaments/:id
pub async fn update_tournament(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TournamentPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(tour_id) = path?;
    let Json(payload) = payload?;
    let tournament = payload.validate()?;

    db::update_tournament(&pool, tour_id, &tournament).await?;

    Ok(Json(MessageResponse::new("Tournament updated successfully")))
}

// DELETE /api/tournaments/:id
pub async fn delete_tournament(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(tour_id) = path?;
    db::delete_tournament(&pool, tour_id).await?;
    tracing::info!(tour_id, "Tournament deleted");

    Ok(Json(MessageResponse::new("Tournament deleted successfully")))
}
