use std::collections::HashMap;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    response::Json,
};
use sqlx::sqlite::SqlitePool;
use crate::db;
use crate::error::ApiError;
use crate::models::{
    MatchCreated, MatchPayload, MatchResult, MatchResultPayload, MatchResultRecorded,
    MatchWithDetails, MessageResponse, MATCH_COMPLETED,
};
use crate::routes::or_empty;

// GET /api/matches - List matches with tournament, team names and result
pub async fn get_matches(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<MatchWithDetails>>, ApiError> {
    let matches = db::get_all_matches(&pool).await?;
    let tournaments = db::get_tournament_options(&pool).await?;
    let teams = db::get_team_options(&pool).await?;
    let results = or_empty(db::get_all_match_results(&pool).await, "match results");

    let tournament_names: HashMap<i64, &str> = tournaments
        .iter()
        .map(|t| (t.tour_id, t.tour_name.as_str()))
        .collect();
    let team_names: HashMap<i64, &str> = teams
        .iter()
        .map(|t| (t.team_id, t.team_name.as_str()))
        .collect();
    let results_by_match: HashMap<i64, &MatchResult> = results
        .iter()
        .map(|r| (r.match_id, r))
        .collect();

    let team_name = |id: i64| {
        team_names
            .get(&id)
            .map_or_else(|| "Unknown Team".to_string(), |n| n.to_string())
    };

    let processed = matches
        .into_iter()
        .map(|m| {
            let result = results_by_match.get(&m.match_id);

            MatchWithDetails {
                tour_name: tournament_names
                    .get(&m.tournament_id)
                    .map_or_else(|| "Unknown Tournament".to_string(), |n| n.to_string()),
                team1_name: team_name(m.team1_id),
                team2_name: team_name(m.team2_id),
                team1_score: result.map(|r| r.team1_score),
                team2_score: result.map(|r| r.team2_score),
                winner_name: result
                    .and_then(|r| r.winner_team_id)
                    .and_then(|id| team_names.get(&id))
                    .map(|n| n.to_string()),
                match_duration: result.and_then(|r| r.match_duration),
                match_row: m,
            }
        })
        .collect();

    Ok(Json(processed))
}

// POST /api/matches - New matches always start as scheduled
pub async fn create_match(
    State(pool): State<SqlitePool>,
    payload: Result<Json<MatchPayload>, JsonRejection>,
) -> Result<Json<MatchCreated>, ApiError> {
    let Json(payload) = payload?;
    let new_match = payload.validate()?;

    let match_id = db::insert_match(&pool, &new_match).await?;
    tracing::info!(match_id, tournament_id = new_match.tournament_id, "Match created");

    Ok(Json(MatchCreated {
        match_id,
        message: "Match created successfully".to_string(),
    }))
}

// PUT /api/matches/:id
pub async fn update_match(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MatchPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(match_id) = path?;
    let Json(payload) = payload?;
    let new_match = payload.validate()?;

    db::update_match(&pool, match_id, &new_match).await?;

    Ok(Json(MessageResponse::new("Match updated successfully")))
}

// DELETE /api/matches/:id
pub async fn delete_match(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(match_id) = path?;
    db::delete_match(&pool, match_id).await?;
    tracing::info!(match_id, "Match deleted");

    Ok(Json(MessageResponse::new("Match deleted successfully")))
}

// POST /api/matches/:id/result - Completes the match and records (or replaces) its result
pub async fn submit_match_result(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MatchResultPayload>, JsonRejection>,
) -> Result<Json<MatchResultRecorded>, ApiError> {
    let Path(match_id) = path?;
    let Json(payload) = payload?;
    let result = payload.validate()?;

    db::set_match_status(&pool, match_id, MATCH_COMPLETED).await?;
    let result_id = db::upsert_match_result(&pool, match_id, &result).await?;
    tracing::info!(match_id, result_id, "Match result recorded");

    Ok(Json(MatchResultRecorded {
        result_id,
        message: "Match result added successfully".to_string(),
    }))
}
