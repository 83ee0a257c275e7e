use super::ApiError;
use crate::domain::{MAX_RATING, MIN_RATING, MovieId, ReviewId};
use crate::models::movie::{MovieUpdate, NewMovie};

pub fn validate_movie_id(id: i32) -> Result<MovieId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid movie ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(MovieId::new(id))
}

pub fn validate_review_id(id: i32) -> Result<ReviewId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid review ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(ReviewId::new(id))
}

pub fn validate_rating(rating: i32) -> Result<i32, ApiError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ApiError::validation(format!(
            "Invalid rating: {}. Rating must be between {} and {}",
            rating, MIN_RATING, MAX_RATING
        )));
    }
    Ok(rating)
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Title, description, genre and director must all be present on create.
pub fn validate_new_movie(movie: &NewMovie) -> Result<(), ApiError> {
    require("Title", &movie.title)?;
    require("Description", &movie.description)?;
    require("Genre", &movie.genre)?;
    require("Director", &movie.director)?;
    Ok(())
}

/// Fields given in an update may not be blanked, except the poster URL.
pub fn validate_movie_update(update: &MovieUpdate) -> Result<(), ApiError> {
    let fields = [
        ("Title", &update.title),
        ("Description", &update.description),
        ("Genre", &update.genre),
        ("Director", &update.director),
    ];

    for (field, value) in fields {
        if let Some(value) = value {
            require(field, value)?;
        }
    }
    Ok(())
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    min_password_length: usize,
) -> Result<(), ApiError> {
    require("Name", name)?;
    validate_email(email)?;

    if password.chars().count() < min_password_length {
        return Err(ApiError::validation(format!(
            "Password must be at least {min_password_length} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed),
        _ => Err(ApiError::validation("A valid email address is required")),
    }
}
