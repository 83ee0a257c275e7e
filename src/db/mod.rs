use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::{MovieId, ReviewId, Role, UserId};
use crate::models::movie::{Movie, MovieUpdate, NewMovie};
use crate::models::review::Review;
use crate::models::user::User;
use crate::models::watchlist::WatchlistEntry;

pub mod migrator;
pub mod repositories;

pub use migrator::{ADMIN_EMAIL, DEFAULT_API_KEY};

/// Current instant as an RFC 3339 UTC string with a fixed width, so that
/// stored timestamps order correctly as text.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every pooled connection to `:memory:` opens its own empty database.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn watchlist_repo(&self) -> repositories::watchlist::WatchlistRepository {
        repositories::watchlist::WatchlistRepository::new(self.conn.clone())
    }

    // Movies

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list_all().await
    }

    pub async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn get_movies_by_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>> {
        self.movie_repo().get_by_ids(ids).await
    }

    pub async fn movie_exists(&self, id: MovieId) -> Result<bool> {
        self.movie_repo().exists(id).await
    }

    pub async fn count_movies(&self) -> Result<u64> {
        self.movie_repo().count().await
    }

    pub async fn add_movie(&self, movie: NewMovie) -> Result<Movie> {
        self.movie_repo().create(movie).await
    }

    pub async fn update_movie(&self, id: MovieId, update: MovieUpdate) -> Result<Option<Movie>> {
        self.movie_repo().update(id, update).await
    }

    pub async fn remove_movie(&self, id: MovieId) -> Result<bool> {
        self.movie_repo().delete(id).await
    }

    // Reviews

    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.review_repo().list_all().await
    }

    pub async fn list_reviews_for_movie(&self, movie_id: MovieId) -> Result<Vec<Review>> {
        self.review_repo().list_for_movie(movie_id).await
    }

    pub async fn list_reviews_for_user(&self, user_id: UserId) -> Result<Vec<Review>> {
        self.review_repo().list_for_user(user_id).await
    }

    pub async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
        self.review_repo().get(id).await
    }

    pub async fn find_review(&self, movie_id: MovieId, user_id: UserId) -> Result<Option<Review>> {
        self.review_repo()
            .find_by_movie_and_user(movie_id, user_id)
            .await
    }

    pub async fn count_reviews(&self) -> Result<u64> {
        self.review_repo().count().await
    }

    pub async fn add_review(
        &self,
        movie_id: MovieId,
        user_id: UserId,
        rating: i32,
        comment: &str,
    ) -> Result<Option<Review>> {
        self.review_repo()
            .create(movie_id, user_id, rating, comment)
            .await
    }

    pub async fn update_review(
        &self,
        id: ReviewId,
        rating: Option<i32>,
        comment: Option<String>,
    ) -> Result<Option<Review>> {
        self.review_repo().update(id, rating, comment).await
    }

    pub async fn remove_review(&self, id: ReviewId) -> Result<bool> {
        self.review_repo().delete(id).await
    }

    // Users

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>> {
        self.user_repo().get_by_ids(ids).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        config: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(name, email, password, role, config)
            .await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn regenerate_user_api_key(&self, id: UserId) -> Result<String> {
        self.user_repo().regenerate_api_key(id).await
    }

    // Watchlist

    pub async fn list_watchlist(&self, user_id: UserId) -> Result<Vec<WatchlistEntry>> {
        self.watchlist_repo().list_for_user(user_id).await
    }

    pub async fn watchlist_contains(&self, user_id: UserId, movie_id: MovieId) -> Result<bool> {
        self.watchlist_repo().contains(user_id, movie_id).await
    }

    pub async fn add_to_watchlist(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<Option<WatchlistEntry>> {
        self.watchlist_repo().add(user_id, movie_id).await
    }

    pub async fn remove_from_watchlist(&self, user_id: UserId, movie_id: MovieId) -> Result<bool> {
        self.watchlist_repo().remove(user_id, movie_id).await
    }
}
