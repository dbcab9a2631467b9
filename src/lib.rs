// Library crate for the community statistics service
// This file exposes the public API for integration tests and the binary

pub mod analytics;
pub mod config;
pub mod matches;
pub mod players;
pub mod shared;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use analytics::{
    AnalyticsLogger, AnalyticsService, LogContext, Operation, StatsFilters, TracingLogger,
};
pub use config::{AnalyticsConfig, AnchorMode, ServerConfig};
pub use matches::{InMemoryMatchLogStore, MatchLogStore, MatchRecord, Participant, ResultFlag};
pub use players::{InMemoryPlayerStatsStore, PlayerCategoryStats, PlayerStats, PlayerStatsStore};
pub use shared::{AppError, AppState, StoreError};

/// Full HTTP application: analytics routes, liveness probe, request tracing
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(analytics::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
