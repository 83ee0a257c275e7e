//! Dashboard analytics endpoints. All public and read-only.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::analytics::{GenreCount, RatedMovie, RatingBucket};
use crate::services::{AnalyticsError, OverviewStats};

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Database(msg) => Self::DatabaseError(msg),
            AnalyticsError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// Raw `limit` is kept as a string so that junk values fall back to the
/// default instead of failing the request.
#[derive(Debug, Deserialize)]
pub struct TopMoviesQuery {
    pub limit: Option<String>,
}

/// `GET /api/analytics/stats`
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OverviewStats>, ApiError> {
    Ok(Json(state.analytics_service().overview().await?))
}

/// `GET /api/analytics/rating-distribution`
pub async fn get_rating_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<Json<[RatingBucket; 5]>, ApiError> {
    Ok(Json(state.analytics_service().rating_distribution().await?))
}

/// `GET /api/analytics/genre-analysis`
pub async fn get_genre_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GenreCount>>, ApiError> {
    Ok(Json(state.analytics_service().genre_analysis().await?))
}

/// `GET /api/analytics/top-movies?limit=N`
pub async fn get_top_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopMoviesQuery>,
) -> Result<Json<Vec<RatedMovie>>, ApiError> {
    let limit = state
        .config()
        .read()
        .await
        .analytics
        .resolve_top_limit(query.limit.as_deref());

    Ok(Json(state.analytics_service().top_movies(limit).await?))
}
