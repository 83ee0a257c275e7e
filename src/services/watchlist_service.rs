//! Domain service for per-user watchlists.

use thiserror::Error;

use crate::domain::{MovieId, UserId};
use crate::models::watchlist::WatchlistItem;

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error("Movie already in watchlist")]
    AlreadyListed,

    #[error("Movie not in watchlist")]
    NotListed,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for WatchlistError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for WatchlistError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait WatchlistService: Send + Sync {
    /// Entries of `user_id`, most recently added first, each with its movie.
    async fn list(&self, user_id: UserId) -> Result<Vec<WatchlistItem>, WatchlistError>;

    async fn add(&self, user_id: UserId, movie_id: MovieId)
    -> Result<WatchlistItem, WatchlistError>;

    async fn remove(&self, user_id: UserId, movie_id: MovieId) -> Result<(), WatchlistError>;

    async fn contains(&self, user_id: UserId, movie_id: MovieId) -> Result<bool, WatchlistError>;
}
