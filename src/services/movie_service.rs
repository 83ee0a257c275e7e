//! Domain service for the movie catalog.
//!
//! Every read attaches freshly computed rating aggregates; nothing derived is
//! stored.

use thiserror::Error;

use crate::analytics::RatedMovie;
use crate::analytics::listing::MovieFilter;
use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieUpdate, NewMovie};

/// Errors specific to movie operations.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MovieError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for the movie catalog.
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Lists movies with their rating aggregates, filtered and ordered by `filter`.
    async fn list(&self, filter: &MovieFilter) -> Result<Vec<RatedMovie>, MovieError>;

    /// Distinct genres present in the catalog, alphabetically.
    async fn genres(&self) -> Result<Vec<String>, MovieError>;

    /// Gets one movie with its rating aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] for an unknown id.
    async fn get(&self, id: MovieId) -> Result<RatedMovie, MovieError>;

    async fn create(&self, movie: NewMovie) -> Result<Movie, MovieError>;

    async fn update(&self, id: MovieId, update: MovieUpdate) -> Result<Movie, MovieError>;

    /// Deletes a movie along with its reviews and watchlist entries.
    async fn delete(&self, id: MovieId) -> Result<(), MovieError>;
}
