use community_stats::{
    build_app,
    matches::PostgresMatchLogStore,
    players::PostgresPlayerStatsStore,
    AnalyticsConfig, AnalyticsService, AppState, InMemoryMatchLogStore, InMemoryPlayerStatsStore,
    MatchLogStore, PlayerStatsStore, ServerConfig,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "community_stats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting community statistics server");

    let server_config = ServerConfig::from_env();
    let analytics_config = AnalyticsConfig::from_env();

    let (match_store, stats_store): (Arc<dyn MatchLogStore>, Arc<dyn PlayerStatsStore>) =
        match &server_config.database_url {
            Some(database_url) => {
                let pool = sqlx::PgPool::connect(database_url).await?;
                info!("Connected to PostgreSQL");
                (
                    Arc::new(PostgresMatchLogStore::new(pool.clone())),
                    Arc::new(PostgresPlayerStatsStore::new(pool)),
                )
            }
            None => {
                warn!("DATABASE_URL not set, serving from empty in-memory stores");
                (
                    Arc::new(InMemoryMatchLogStore::new()),
                    Arc::new(InMemoryPlayerStatsStore::new()),
                )
            }
        };

    let analytics = AnalyticsService::builder(match_store, stats_store)
        .with_config(analytics_config)
        .build();
    let app = build_app(AppState::new(Arc::new(analytics)));

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    info!(addr = %server_config.bind_addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
