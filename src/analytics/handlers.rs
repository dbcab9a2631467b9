use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    models::{ActivityDataPoint, ClassStat, MetaSummary, StatsFilters},
    types::AnalyticsParams,
};
use crate::shared::{AppError, AppState};

const CACHE_CONTROL: &str = "public, max-age=120, must-revalidate";

/// Routes served under `/api/analytics`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/analytics/activity", get(activity))
        .route("/api/analytics/elo-history", get(elo_history))
        .route("/api/analytics/win-rate", get(win_rate))
        .route("/api/analytics/class-stats", get(class_stats))
        .route("/api/analytics/meta", get(meta))
}

/// GET /api/analytics/activity
/// Daily match counts over the requested window
#[instrument(name = "get_activity", skip(state))]
pub async fn activity(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Json<Vec<ActivityDataPoint>> {
    let filters = StatsFilters::from(params);
    let points = state.analytics.get_activity(&filters).await;

    info!(days = points.len(), "Activity computed");

    Json(points)
}

/// GET /api/analytics/elo-history
///
/// `player` and `category` are required; everything else degrades to
/// defaults inside the engine.
#[instrument(name = "get_elo_history", skip(state))]
pub async fn elo_history(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, AppError> {
    let filters = StatsFilters::from(params);
    let (Some(player), Some(category)) = (filters.player.as_deref(), filters.category.as_deref())
    else {
        return Err(AppError::BadRequest(
            "player and category are required".to_string(),
        ));
    };

    let history = state
        .analytics
        .get_rating_history(
            player,
            category,
            filters.start_date.as_deref(),
            filters.end_date.as_deref(),
        )
        .await;

    info!(points = history.len(), "Rating history computed");

    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(history)))
}

/// GET /api/analytics/win-rate
#[instrument(name = "get_win_rate", skip(state))]
pub async fn win_rate(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> impl IntoResponse {
    let filters = StatsFilters::from(params);
    let summary = state.analytics.get_win_rate(&filters).await;

    info!(games = summary.total(), "Win rate computed");

    ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(summary))
}

/// GET /api/analytics/class-stats
#[instrument(name = "get_class_stats", skip(state))]
pub async fn class_stats(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Json<Vec<ClassStat>> {
    let filters = StatsFilters::from(params);
    Json(
        state
            .analytics
            .get_class_stats(filters.category.as_deref())
            .await,
    )
}

/// GET /api/analytics/meta
/// Every meta-page chart in one response
#[instrument(name = "get_meta", skip(state))]
pub async fn meta(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Json<MetaSummary> {
    let filters = StatsFilters::from(params);
    let summary = state.analytics.get_meta(&filters).await;

    info!(
        activity_days = summary.activity.len(),
        classes = summary.class_selection.len(),
        "Meta computed"
    );

    Json(summary)
}
