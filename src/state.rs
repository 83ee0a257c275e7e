use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AnalyticsService, AuthService, MovieService, ReviewService, SeaOrmAnalyticsService,
    SeaOrmAuthService, SeaOrmMovieService, SeaOrmReviewService, SeaOrmWatchlistService,
    WatchlistService,
};

/// Long-lived state shared by the HTTP layer and the CLI commands.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub movie_service: Arc<dyn MovieService>,

    pub review_service: Arc<dyn ReviewService>,

    pub watchlist_service: Arc<dyn WatchlistService>,

    pub analytics_service: Arc<dyn AnalyticsService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let config = Arc::new(RwLock::new(config));

        let movie_service: Arc<dyn MovieService> = Arc::new(SeaOrmMovieService::new(store.clone()));
        let review_service: Arc<dyn ReviewService> =
            Arc::new(SeaOrmReviewService::new(store.clone()));
        let watchlist_service: Arc<dyn WatchlistService> =
            Arc::new(SeaOrmWatchlistService::new(store.clone()));
        let analytics_service: Arc<dyn AnalyticsService> =
            Arc::new(SeaOrmAnalyticsService::new(store.clone()));
        let auth_service: Arc<dyn AuthService> =
            Arc::new(SeaOrmAuthService::new(store.clone(), config.clone()));

        Self {
            config,
            store,
            movie_service,
            review_service,
            watchlist_service,
            analytics_service,
            auth_service,
        }
    }
}
