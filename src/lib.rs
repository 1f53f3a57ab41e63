//! REST backend for a sports tournament manager: players, teams,
//! tournaments, matches and results, plus derived standings.

use std::path::Path;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::sqlite::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod stats;

/// Build the full application: JSON API, static pages and middleware.
pub fn create_router(pool: SqlitePool, public_dir: impl AsRef<Path>) -> Router {
    let public_dir = public_dir.as_ref();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))

        // Player endpoints
        .route("/api/players", get(routes::players::get_players).post(routes::players::create_player))
        .route("/api/players/simple", get(routes::players::get_players_simple))
        .route("/api/players/{id}", put(routes::players::update_player).delete(routes::players::delete_player))

        // Team endpoints
        .route("/api/teams", get(routes::teams::get_teams).post(routes::teams::create_team))
        .route("/api/teams/simple", get(routes::teams::get_teams_simple))
        .route("/api/teams/{id}", put(routes::teams::update_team).delete(routes::teams::delete_team))

        // Tournament endpoints
        .route("/api/tournaments", get(routes::tournaments::get_tournaments).post(routes::tournaments::create_tournament))
        .route("/api/tournaments/simple", get(routes::tournaments::get_tournaments_simple))
        .route("/api/tournaments/{id}", put(routes::tournaments::update_tournament).delete(routes::tournaments::delete_tournament))

        // Match endpoints
        .route("/api/matches", get(routes::matches::get_matches).post(routes::matches::create_match))
        .route("/api/matches/{id}", put(routes::matches::update_match).delete(routes::matches::delete_match))
        .route("/api/matches/{id}/result", post(routes::matches::submit_match_result))

        // Stats endpoints
        .route("/api/stats/players", get(routes::stats::get_player_stats))
        .route("/api/stats/teams", get(routes::stats::get_team_stats))
        .route("/api/stats/tournaments", get(routes::stats::get_tournament_stats))

        // Pages
        .route_service("/", ServeFile::new(public_dir.join("tournament.html")))
        .route_service("/erd", ServeFile::new(public_dir.join("erd.html")))
        .route_service("/stats", ServeFile::new(public_dir.join("stats.html")))
        .fallback_service(ServeDir::new(public_dir))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}
