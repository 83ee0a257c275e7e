//! Movie catalog endpoints.
//!
//! Reads are public and carry rating aggregates computed on the fly;
//! writes require the admin role.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{validate_movie_id, validate_movie_update, validate_new_movie};
use super::{ApiError, AppState, MessageResponse};
use crate::analytics::RatedMovie;
use crate::analytics::listing::MovieFilter;
use crate::models::movie::{Movie, MovieUpdate, NewMovie};
use crate::services::MovieError;

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::NotFound(_) => Self::not_found("Movie"),
            MovieError::Validation(msg) => Self::validation(msg),
            MovieError::Database(msg) => Self::DatabaseError(msg),
            MovieError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/movies`
///
/// Supports `search`, `genre`, `rating` and `sort` query parameters.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<MovieFilter>, QueryRejection>,
) -> Result<Json<Vec<RatedMovie>>, ApiError> {
    let Query(filter) = filter?;
    let movies = state.movie_service().list(&filter).await?;
    Ok(Json(movies))
}

/// `GET /api/movies/genres`
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.movie_service().genres().await?))
}

/// `GET /api/movies/{id}`
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<RatedMovie>, ApiError> {
    let id = validate_movie_id(id)?;
    Ok(Json(state.movie_service().get(id).await?))
}

/// `POST /api/movies` (admin)
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> Result<(StatusCode, Json<Movie>), ApiError> {
    let Json(mut payload) = payload?;
    validate_new_movie(&payload)?;

    payload.image_url = payload.image_url.filter(|url| !url.trim().is_empty());

    let movie = state.movie_service().create(payload).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// `PUT /api/movies/{id}` (admin)
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<MovieUpdate>, JsonRejection>,
) -> Result<Json<Movie>, ApiError> {
    let id = validate_movie_id(id)?;
    let Json(payload) = payload?;
    validate_movie_update(&payload)?;

    Ok(Json(state.movie_service().update(id, payload).await?))
}

/// `DELETE /api/movies/{id}` (admin)
///
/// Also removes the movie's reviews and watchlist entries.
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = validate_movie_id(id)?;
    state.movie_service().delete(id).await?;
    Ok(Json(MessageResponse::new("Movie deleted successfully")))
}
