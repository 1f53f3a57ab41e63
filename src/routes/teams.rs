use std::collections::HashMap;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    response::Json,
};
use sqlx::sqlite::SqlitePool;
use crate::db;
use crate::error::ApiError;
use crate::models::{
    MessageResponse, TeamCreated, TeamOption, TeamPayload, TeamWithDetails, ROLE_CAPTAIN,
};
use crate::stats::count_by;

// GET /api/teams - List all teams with captain name and active member count
pub async fn get_teams(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<TeamWithDetails>>, ApiError> {
    let teams = db::get_all_teams(&pool).await?;
    let players = db::get_all_players(&pool).await?;
    let memberships = db::get_active_memberships(&pool).await?;

    let captain_names: HashMap<i64, &str> = players
        .iter()
        .map(|p| (p.player_id, p.player_name.as_str()))
        .collect();
    let member_counts = count_by(memberships.iter().map(|m| m.team_id));

    let processed = teams
        .into_iter()
        .map(|team| TeamWithDetails {
            captain_name: captain_names.get(&team.captain_id).map(|n| n.to_string()),
            member_count: member_counts.get(&team.team_id).copied().unwrap_or(0),
            team,
        })
        .collect();

    Ok(Json(processed))
}

// GET /api/teams/simple - Id and name for dropdowns
pub async fn get_teams_simple(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<TeamOption>>, ApiError> {
    let teams = db::get_team_options(&pool).await?;

    Ok(Json(teams))
}

// POST /api/teams - Creates the team and its captain's membership
pub async fn create_team(
    State(pool): State<SqlitePool>,
    payload: Result<Json<TeamPayload>, JsonRejection>,
) -> Result<Json<TeamCreated>, ApiError> {
    let Json(payload) = payload?;
    let team = payload.validate()?;

    let team_id = db::insert_team(&pool, &team).await?;
    db::insert_membership(&pool, team_id, team.captain_id, ROLE_CAPTAIN).await?;
    tracing::info!(team_id, captain_id = team.captain_id, "Team created");

    Ok(Json(TeamCreated {
        team_id,
        message: "Team created successfully".to_string(),
    }))
}

// PUT /api/teams/:id - Renames the team and hands the captain role over
pub async fn update_team(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TeamPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(team_id) = path?;
    let Json(payload) = payload?;
    let team = payload.validate()?;

    let updated = db::update_team(&pool, team_id, &team).await?;

    if updated > 0 {
        db::demote_captains(&pool, team_id).await?;
        let promoted = db::promote_captain(&pool, team_id, team.captain_id).await?;

        // New captain wasn't on the roster yet.
        if promoted == 0 {
            db::insert_membership(&pool, team_id, team.captain_id, ROLE_CAPTAIN).await?;
            tracing::info!(team_id, captain_id = team.captain_id, "Added captain membership");
        }
    }

    Ok(Json(MessageResponse::new("Team updated successfully")))
}

// DELETE /api/teams/:id
pub async fn delete_team(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(team_id) = path?;
    db::delete_team(&pool, team_id).await?;
    tracing::info!(team_id, "Team deleted");

    Ok(Json(MessageResponse::new("Team deleted successfully")))
}
