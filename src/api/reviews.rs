use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_movie_id, validate_rating, validate_review_id};
use super::{ApiError, AppState, MessageResponse};
use crate::models::review::{NewReview, ReviewDetail, ReviewUpdate};
use crate::services::ReviewError;

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(_) => Self::not_found("Review"),
            ReviewError::MovieNotFound(_) => Self::not_found("Movie"),
            err @ ReviewError::AlreadyReviewed => Self::validation(err.to_string()),
            ReviewError::Forbidden(msg) => Self::forbidden(msg),
            ReviewError::Validation(msg) => Self::validation(msg),
            ReviewError::Database(msg) => Self::DatabaseError(msg),
            ReviewError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/reviews/movie/{movie_id}`, newest first.
pub async fn list_for_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> Result<Json<Vec<ReviewDetail>>, ApiError> {
    let movie_id = validate_movie_id(movie_id)?;
    Ok(Json(state.review_service().list_for_movie(movie_id).await?))
}

/// `GET /api/reviews/user`: the caller's own reviews.
pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<ReviewDetail>>, ApiError> {
    Ok(Json(state.review_service().list_for_user(user.id).await?))
}

/// `GET /api/reviews/{id}`
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ReviewDetail>, ApiError> {
    let id = validate_review_id(id)?;
    Ok(Json(state.review_service().get(id).await?))
}

/// `POST /api/reviews`
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewDetail>), ApiError> {
    let Json(payload) = payload?;
    validate_movie_id(payload.movie_id.value())?;
    validate_rating(payload.rating)?;

    let review = state.review_service().create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `PUT /api/reviews/{id}` (author only)
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    payload: Result<Json<ReviewUpdate>, JsonRejection>,
) -> Result<Json<ReviewDetail>, ApiError> {
    let id = validate_review_id(id)?;
    let Json(payload) = payload?;
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }

    Ok(Json(
        state.review_service().update(user.id, id, payload).await?,
    ))
}

/// `DELETE /api/reviews/{id}` (author only)
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = validate_review_id(id)?;
    state.review_service().delete(user.id, id).await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
