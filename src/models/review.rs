use serde::{Deserialize, Serialize};

use crate::domain::{MovieId, ReviewId, UserId};
use crate::models::movie::MovieRef;
use crate::models::user::UserRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,

    pub movie_id: MovieId,

    pub user_id: UserId,

    /// Star rating, `1..=5`.
    pub rating: i32,

    pub comment: String,

    pub created_at: String,

    pub updated_at: String,
}

/// A review as returned by the API, with its movie and author embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDetail {
    #[serde(flatten)]
    pub review: Review,
    pub movie: MovieRef,
    pub user: UserRef,
}

/// Body of `POST /reviews`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub movie_id: MovieId,

    pub rating: i32,

    #[serde(default)]
    pub comment: String,
}

/// Body of `PUT /reviews/{id}`. The movie and author of a review never change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewUpdate {
    pub rating: Option<i32>,

    pub comment: Option<String>,
}
