use tournament_api::{config::Config, create_router, db};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting tournament server...");

    let config = Config::from_env().inspect_err(|e| tracing::error!("Invalid configuration: {}", e))?;

    let pool = db::connect(&config.database)
        .await
        .inspect_err(|e| tracing::error!("Database connection failed: {}", e))?;

    match db::connection_summary(&pool).await {
        Ok((players, memberships)) => {
            tracing::info!("Database connection established.");
            tracing::info!("Found {} players and {} team memberships", players, memberships);
        }
        Err(e) => tracing::warn!("Connected, but the summary query failed: {}", e),
    }

    let app = create_router(pool, &config.public_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;

    tracing::info!("Tournament server listening on http://{}", config.bind);
    tracing::info!("Database schema page: http://{}/erd", config.bind);
    tracing::info!("Statistics page: http://{}/stats", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
