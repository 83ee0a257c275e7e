//! Domain service exposing catalog-wide analytics.

use serde::Serialize;
use thiserror::Error;

use crate::analytics::{GenreCount, RatedMovie, RatingBucket};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AnalyticsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AnalyticsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_movies: u64,
    pub total_reviews: u64,
    pub total_users: u64,
    /// Mean over every review, one decimal; `0` when there are none.
    pub average_rating: f64,
}

#[async_trait::async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn overview(&self) -> Result<OverviewStats, AnalyticsError>;

    /// Review counts for each star value, one to five.
    async fn rating_distribution(&self) -> Result<[RatingBucket; 5], AnalyticsError>;

    /// Movie counts per genre, most common first.
    async fn genre_analysis(&self) -> Result<Vec<GenreCount>, AnalyticsError>;

    /// Best-rated reviewed movies, at most `limit` of them.
    async fn top_movies(&self, limit: usize) -> Result<Vec<RatedMovie>, AnalyticsError>;
}
