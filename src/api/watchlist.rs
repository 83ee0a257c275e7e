use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_movie_id;
use super::{ApiError, AppState, MessageResponse, WatchlistCheckResponse};
use crate::models::watchlist::WatchlistItem;
use crate::services::WatchlistError;

impl From<WatchlistError> for ApiError {
    fn from(err: WatchlistError) -> Self {
        match err {
            WatchlistError::MovieNotFound(_) => Self::not_found("Movie"),
            err @ WatchlistError::AlreadyListed => Self::validation(err.to_string()),
            err @ WatchlistError::NotListed => Self::NotFound(err.to_string()),
            WatchlistError::Database(msg) => Self::DatabaseError(msg),
            WatchlistError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/watchlist`
pub async fn list_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<WatchlistItem>>, ApiError> {
    Ok(Json(state.watchlist_service().list(user.id).await?))
}

/// `POST /api/watchlist/{movie_id}`
pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(movie_id): Path<i32>,
) -> Result<(StatusCode, Json<WatchlistItem>), ApiError> {
    let movie_id = validate_movie_id(movie_id)?;
    let item = state.watchlist_service().add(user.id, movie_id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `DELETE /api/watchlist/{movie_id}`
pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(movie_id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let movie_id = validate_movie_id(movie_id)?;
    state.watchlist_service().remove(user.id, movie_id).await?;
    Ok(Json(MessageResponse::new("Movie removed from watchlist")))
}

/// `GET /api/watchlist/check/{movie_id}`
pub async fn check_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(movie_id): Path<i32>,
) -> Result<Json<WatchlistCheckResponse>, ApiError> {
    let movie_id = validate_movie_id(movie_id)?;
    let in_watchlist = state
        .watchlist_service()
        .contains(user.id, movie_id)
        .await?;
    Ok(Json(WatchlistCheckResponse { in_watchlist }))
}
