use axum::{extract::State, response::Json};
use sqlx::sqlite::SqlitePool;
use crate::db;
use crate::error::ApiError;
use crate::models::{PlayerStats, TeamStats, TournamentStats};
use crate::routes::or_empty;
use crate::stats;

// The reads below are sequential and unsynchronised; a concurrent write can
// leave a response briefly out of step with the store.

// GET /api/stats/players - Win rate per player, best first
pub async fn get_player_stats(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<PlayerStats>>, ApiError> {
    let players = db::get_all_players(&pool).await?;
    let memberships = db::get_active_memberships(&pool).await?;
    let matches = db::get_all_matches(&pool).await?;
    let results = or_empty(db::get_all_match_results(&pool).await, "match results");
    let participants = or_empty(db::get_tournament_participants(&pool).await, "tournament participants");

    Ok(Json(stats::player_stats(
        players,
        &memberships,
        &matches,
        &results,
        &participants,
    )))
}

// GET /api/stats/teams - Ranked team standings
pub async fn get_team_stats(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<TeamStats>>, ApiError> {
    let teams = db::get_all_teams(&pool).await?;
    let players = db::get_all_players(&pool).await?;
    let memberships = db::get_active_memberships(&pool).await?;
    let matches = db::get_all_matches(&pool).await?;
    let results = or_empty(db::get_all_match_results(&pool).await, "match results");
    let participants = or_empty(db::get_tournament_participants(&pool).await, "tournament participants");

    Ok(Json(stats::team_rankings(
        teams,
        &players,
        &memberships,
        &matches,
        &results,
        &participants,
    )))
}

// GET /api/stats/tournaments - Progress per tournament, newest first
pub async fn get_tournament_stats(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<TournamentStats>>, ApiError> {
    let tournaments = db::get_all_tournaments(&pool).await?;
    let teams = db::get_all_teams(&pool).await?;
    let participants = or_empty(db::get_tournament_participants(&pool).await, "tournament participants");
    let matches = db::get_all_matches(&pool).await?;

    Ok(Json(stats::tournament_progress(
        tournaments,
        &teams,
        &participants,
        &matches,
    )))
}
