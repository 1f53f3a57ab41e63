use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use crate::models::*;

/// Connection settings for the tournament store
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
}

/// Open the pool and bring the schema up to date.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Each in-memory connection is its own database; pin to one connection and keep it open.
    let max_connections = if is_in_memory(&config.database_url) {
        1
    } else {
        config.max_connections
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Exact player count and membership count, logged once at startup
pub async fn connection_summary(pool: &SqlitePool) -> Result<(i64, i64), sqlx::Error> {
    let players: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM player"#)
        .fetch_one(pool)
        .await?;

    let memberships: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM team_members"#)
        .fetch_one(pool)
        .await?;

    Ok((players, memberships))
}

// Player queries
pub async fn get_all_players(pool: &SqlitePool) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"SELECT player_id, player_name, age, username, email FROM player ORDER BY player_id"#
    )
    .fetch_all(pool)
    .await
}

pub async fn get_player_options(pool: &SqlitePool) -> Result<Vec<PlayerOption>, sqlx::Error> {
    sqlx::query_as::<_, PlayerOption>(
        r#"SELECT player_id, player_name FROM player ORDER BY player_name"#
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_player(pool: &SqlitePool, player: &NewPlayer) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"INSERT INTO player (player_name, age, username, email)
           VALUES (?, ?, ?, ?)
           RETURNING player_id"#
    )
    .bind(&player.player_name)
    .bind(player.age)
    .bind(&player.username)
    .bind(&player.email)
    .fetch_one(pool)
    .await
}

pub async fn update_player(pool: &SqlitePool, player_id: i64, player: &NewPlayer) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE player SET player_name = ?, age = ?, username = ?, email = ?
           WHERE player_id = ?"#
    )
    .bind(&player.player_name)
    .bind(player.age)
    .bind(&player.username)
    .bind(&player.email)
    .bind(player_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_player(pool: &SqlitePool, player_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM player WHERE player_id = ?"#)
        .bind(player_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// Team queries
pub async fn get_all_teams(pool: &SqlitePool) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"SELECT team_id, team_name, captain_id FROM team ORDER BY team_id"#
    )
    .fetch_all(pool)
    .await
}

pub async fn get_team_options(pool: &SqlitePool) -> Result<Vec<TeamOption>, sqlx::Error> {
    sqlx::query_as::<_, TeamOption>(
        r#"SELECT team_id, team_name FROM team ORDER BY team_name"#
    )
    .fetch_all(pool)
    .await
}

pub async fn get_teams_captained_by(pool: &SqlitePool, player_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT team_id FROM team WHERE captain_id = ?"#)
        .bind(player_id)
        .fetch_all(pool)
        .await
}

pub async fn insert_team(pool: &SqlitePool, team: &NewTeam) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"INSERT INTO team (team_name, captain_id) VALUES (?, ?) RETURNING team_id"#
    )
    .bind(&team.team_name)
    .bind(team.captain_id)
    .fetch_one(pool)
    .await
}

pub async fn update_team(pool: &SqlitePool, team_id: i64, team: &NewTeam) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE team SET team_name = ?, captain_id = ? WHERE team_id = ?"#
    )
    .bind(&team.team_name)
    .bind(team.captain_id)
    .bind(team_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_team(pool: &SqlitePool, team_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM team WHERE team_id = ?"#)
        .bind(team_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// Membership queries
pub async fn get_active_memberships(pool: &SqlitePool) -> Result<Vec<TeamMembership>, sqlx::Error> {
    sqlx::query_as::<_, TeamMembership>(
        r#"SELECT member_id, team_id, player_id, role, is_active
           FROM team_members
           WHERE is_active = ?
           ORDER BY member_id"#
    )
    .bind(true)
    .fetch_all(pool)
    .await
}

pub async fn insert_membership(
    pool: &SqlitePool,
    team_id: i64,
    player_id: i64,
    role: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"INSERT INTO team_members (team_id, player_id, role, is_active)
           VALUES (?, ?, ?, ?)
           RETURNING member_id"#
    )
    .bind(team_id)
    .bind(player_id)
    .bind(role)
    .bind(true)
    .fetch_one(pool)
    .await
}

/// Demote whoever currently holds `captain` on the team.
pub async fn demote_captains(pool: &SqlitePool, team_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE team_members SET role = ? WHERE team_id = ? AND role = ?"#
    )
    .bind(ROLE_MEMBER)
    .bind(team_id)
    .bind(ROLE_CAPTAIN)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Promote the player's active membership row; returns 0 when the player has none.
pub async fn promote_captain(pool: &SqlitePool, team_id: i64, player_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE team_members SET role = ?
           WHERE team_id = ? AND player_id = ? AND is_active = ?"#
    )
    .bind(ROLE_CAPTAIN)
    .bind(team_id)
    .bind(player_id)
    .bind(true)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

// Tournament queries
pub async fn get_all_tournaments(pool: &SqlitePool) -> Result<Vec<Tournament>, sqlx::Error> {
    sqlx::query_as::<_, Tournament>(
        r#"SELECT tour_id, tour_name, tour_season, start_date, end_date,
                  organizer_team_id, max_participants
           FROM tournament
           ORDER BY tour_id"#
    )
    .fetch_all(pool)
    .await
}

pub async fn get_tournament_options(pool: &SqlitePool) -> Result<Vec<TournamentOption>, sqlx::Error> {
    sqlx::query_as::<_, TournamentOption>(
        r#"SELECT tour_id, tour_name, tour_season FROM tournament ORDER BY tour_name"#
    )
    .fetch_all(pool)
    .await
}

pub async fn get_tournament_participants(pool: &SqlitePool) -> Result<Vec<TournamentParticipant>, sqlx::Error> {
    sqlx::query_as::<_, TournamentParticipant>(
        r#"SELECT tournament_id, team_id FROM tournament_participants"#
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_tournament(pool: &SqlitePool, tournament: &NewTournament) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"INSERT INTO tournament
               (tour_name, tour_season, start_date, end_date, organizer_team_id, max_participants)
           VALUES (?, ?, ?, ?, ?, ?)
           RETURNING tour_id"#
    )
    .bind(&tournament.tour_name)
    .bind(&tournament.tour_season)
    .bind(&tournament.start_date)
    .bind(&tournament.end_date)
    .bind(tournament.organizer_team_id)
    .bind(tournament.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS))
    .fetch_one(pool)
    .await
}

pub async fn update_tournament(
    pool: &SqlitePool,
    tour_id: i64,
    tournament: &NewTournament,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE tournament
           SET tour_name = ?, tour_season = ?, start_date = ?, end_date = ?,
               organizer_team_id = ?, max_participants = COALESCE(?, max_participants)
           WHERE tour_id = ?"#
    )
    .bind(&tournament.tour_name)
    .bind(&tournament.tour_season)
    .bind(&tournament.start_date)
    .bind(&tournament.end_date)
    .bind(tournament.organizer_team_id)
    .bind(tournament.max_participants)
    .bind(tour_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_tournament(pool: &SqlitePool, tour_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM tournament WHERE tour_id = ?"#)
        .bind(tour_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// Match queries
pub async fn get_all_matches(pool: &SqlitePool) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"SELECT match_id, tournament_id, round, scheduled_at, team1_id, team2_id, status
           FROM match_table
           ORDER BY scheduled_at, match_id"#
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_match(pool: &SqlitePool, new_match: &NewMatch) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"INSERT INTO match_table (tournament_id, round, scheduled_at, team1_id, team2_id, status)
           VALUES (?, ?, ?, ?, ?, ?)
           RETURNING match_id"#
    )
    .bind(new_match.tournament_id)
    .bind(&new_match.round)
    .bind(&new_match.scheduled_at)
    .bind(new_match.team1_id)
    .bind(new_match.team2_id)
    .bind(MATCH_SCHEDULED)
    .fetch_one(pool)
    .await
}

pub async fn update_match(pool: &SqlitePool, match_id: i64, new_match: &NewMatch) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE match_table
           SET tournament_id = ?, round = ?, scheduled_at = ?, team1_id = ?, team2_id = ?, status = ?
           WHERE match_id = ?"#
    )
    .bind(new_match.tournament_id)
    .bind(&new_match.round)
    .bind(&new_match.scheduled_at)
    .bind(new_match.team1_id)
    .bind(new_match.team2_id)
    .bind(&new_match.status)
    .bind(match_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn set_match_status(pool: &SqlitePool, match_id: i64, status: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"UPDATE match_table SET status = ? WHERE match_id = ?"#)
        .bind(status)
        .bind(match_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_match(pool: &SqlitePool, match_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM match_table WHERE match_id = ?"#)
        .bind(match_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// Match result queries
pub async fn get_all_match_results(pool: &SqlitePool) -> Result<Vec<MatchResult>, sqlx::Error> {
    sqlx::query_as::<_, MatchResult>(
        r#"SELECT result_id, match_id, winner_team_id, team1_score, team2_score, match_duration, notes
           FROM match_result"#
    )
    .fetch_all(pool)
    .await
}

/// Insert or replace the result for a match, keyed by `match_id`.
pub async fn upsert_match_result(
    pool: &SqlitePool,
    match_id: i64,
    result: &NewMatchResult,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"INSERT INTO match_result
               (match_id, winner_team_id, team1_score, team2_score, match_duration, notes)
           VALUES (?, ?, ?, ?, ?, ?)
           ON CONFLICT (match_id) DO UPDATE SET
               winner_team_id = excluded.winner_team_id,
               team1_score = excluded.team1_score,
               team2_score = excluded.team2_score,
               match_duration = excluded.match_duration,
               notes = excluded.notes
           RETURNING result_id"#
    )
    .bind(match_id)
    .bind(result.winner_team_id)
    .bind(result.team1_score)
    .bind(result.team2_score)
    .bind(result.match_duration)
    .bind(&result.notes)
    .fetch_one(pool)
    .await
}
