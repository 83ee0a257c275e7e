//! Domain service for reviews.
//!
//! A user holds at most one review per movie, and only the author may change
//! or remove it.

use thiserror::Error;

use crate::domain::{MovieId, ReviewId, UserId};
use crate::models::review::{NewReview, ReviewDetail, ReviewUpdate};

/// Errors specific to review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(ReviewId),

    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error("You have already reviewed this movie. Update your existing review instead.")]
    AlreadyReviewed,

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for reviews.
#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    /// Reviews of a movie, newest first.
    async fn list_for_movie(&self, movie_id: MovieId) -> Result<Vec<ReviewDetail>, ReviewError>;

    /// Reviews written by `user_id`, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ReviewDetail>, ReviewError>;

    async fn get(&self, id: ReviewId) -> Result<ReviewDetail, ReviewError>;

    /// Creates a review authored by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::MovieNotFound`] for an unknown movie and
    /// [`ReviewError::AlreadyReviewed`] when the user already reviewed it.
    async fn create(&self, user_id: UserId, review: NewReview)
    -> Result<ReviewDetail, ReviewError>;

    /// Updates rating and/or comment.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Forbidden`] when `user_id` is not the author.
    async fn update(
        &self,
        user_id: UserId,
        id: ReviewId,
        update: ReviewUpdate,
    ) -> Result<ReviewDetail, ReviewError>;

    /// Deletes a review owned by `user_id`.
    async fn delete(&self, user_id: UserId, id: ReviewId) -> Result<(), ReviewError>;
}
