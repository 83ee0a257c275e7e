//! `SeaORM` implementation of the `AnalyticsService` trait.

use async_trait::async_trait;

use crate::analytics::{self, GenreCount, RatedMovie, RatingBucket};
use crate::db::Store;
use crate::services::analytics_service::{AnalyticsError, AnalyticsService, OverviewStats};

pub struct SeaOrmAnalyticsService {
    store: Store,
}

impl SeaOrmAnalyticsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AnalyticsService for SeaOrmAnalyticsService {
    async fn overview(&self) -> Result<OverviewStats, AnalyticsError> {
        let (total_movies, total_users, reviews) = tokio::join!(
            self.store.count_movies(),
            self.store.count_users(),
            self.store.list_reviews()
        );

        let reviews = reviews?;
        let summary = analytics::aggregate(&reviews);

        Ok(OverviewStats {
            total_movies: total_movies?,
            total_reviews: u64::try_from(reviews.len()).unwrap_or(u64::MAX),
            total_users: total_users?,
            average_rating: summary.average_rating,
        })
    }

    async fn rating_distribution(&self) -> Result<[RatingBucket; 5], AnalyticsError> {
        let reviews = self.store.list_reviews().await?;
        Ok(analytics::rating_distribution(&reviews))
    }

    async fn genre_analysis(&self) -> Result<Vec<GenreCount>, AnalyticsError> {
        let movies = self.store.list_movies().await?;
        Ok(analytics::genre_counts(&movies))
    }

    async fn top_movies(&self, limit: usize) -> Result<Vec<RatedMovie>, AnalyticsError> {
        let (movies, reviews) = tokio::join!(self.store.list_movies(), self.store.list_reviews());
        Ok(analytics::top_rated(&movies?, &reviews?, limit))
    }
}
