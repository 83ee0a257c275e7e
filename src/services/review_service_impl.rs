//! `SeaORM` implementation of the `ReviewService` trait.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::db::Store;
use crate::domain::{MovieId, ReviewId, UserId};
use crate::models::movie::MovieRef;
use crate::models::review::{NewReview, Review, ReviewDetail, ReviewUpdate};
use crate::models::user::UserRef;
use crate::services::review_service::{ReviewError, ReviewService};

pub struct SeaOrmReviewService {
    store: Store,
}

impl SeaOrmReviewService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Embeds movie and author into each review, preserving order.
    async fn with_details(&self, reviews: Vec<Review>) -> Result<Vec<ReviewDetail>, ReviewError> {
        let movie_ids: Vec<MovieId> = reviews
            .iter()
            .map(|r| r.movie_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let user_ids: Vec<UserId> = reviews
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let (movies, users) = tokio::join!(
            self.store.get_movies_by_ids(&movie_ids),
            self.store.get_users_by_ids(&user_ids)
        );

        let movies: HashMap<MovieId, MovieRef> = movies?
            .iter()
            .map(|m| (m.id, MovieRef::from(m)))
            .collect();
        let users: HashMap<UserId, UserRef> = users?
            .iter()
            .map(|u| (u.id, UserRef::from(u)))
            .collect();

        Ok(reviews
            .into_iter()
            .filter_map(|review| {
                let movie = movies.get(&review.movie_id)?.clone();
                let user = users.get(&review.user_id)?.clone();
                Some(ReviewDetail {
                    review,
                    movie,
                    user,
                })
            })
            .collect())
    }

    async fn detail(&self, review: Review) -> Result<ReviewDetail, ReviewError> {
        let id = review.id;
        self.with_details(vec![review])
            .await?
            .pop()
            .ok_or(ReviewError::NotFound(id))
    }

    async fn owned_review(
        &self,
        user_id: UserId,
        id: ReviewId,
        action: &str,
    ) -> Result<Review, ReviewError> {
        let review = self
            .store
            .get_review(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        if review.user_id != user_id {
            return Err(ReviewError::Forbidden(format!(
                "You can only {action} your own reviews"
            )));
        }

        Ok(review)
    }
}

#[async_trait]
impl ReviewService for SeaOrmReviewService {
    async fn list_for_movie(&self, movie_id: MovieId) -> Result<Vec<ReviewDetail>, ReviewError> {
        let reviews = self.store.list_reviews_for_movie(movie_id).await?;
        self.with_details(reviews).await
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ReviewDetail>, ReviewError> {
        let reviews = self.store.list_reviews_for_user(user_id).await?;
        self.with_details(reviews).await
    }

    async fn get(&self, id: ReviewId) -> Result<ReviewDetail, ReviewError> {
        let review = self
            .store
            .get_review(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        self.detail(review).await
    }

    async fn create(
        &self,
        user_id: UserId,
        review: NewReview,
    ) -> Result<ReviewDetail, ReviewError> {
        if !self.store.movie_exists(review.movie_id).await? {
            return Err(ReviewError::MovieNotFound(review.movie_id));
        }

        if self
            .store
            .find_review(review.movie_id, user_id)
            .await?
            .is_some()
        {
            return Err(ReviewError::AlreadyReviewed);
        }

        let created = self
            .store
            .add_review(review.movie_id, user_id, review.rating, review.comment.trim())
            .await?
            .ok_or(ReviewError::AlreadyReviewed)?;

        self.detail(created).await
    }

    async fn update(
        &self,
        user_id: UserId,
        id: ReviewId,
        update: ReviewUpdate,
    ) -> Result<ReviewDetail, ReviewError> {
        self.owned_review(user_id, id, "update").await?;

        let updated = self
            .store
            .update_review(id, update.rating, update.comment.map(|c| c.trim().to_string()))
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        info!("Review {id} updated by user {user_id}");
        self.detail(updated).await
    }

    async fn delete(&self, user_id: UserId, id: ReviewId) -> Result<(), ReviewError> {
        self.owned_review(user_id, id, "delete").await?;

        if !self.store.remove_review(id).await? {
            return Err(ReviewError::NotFound(id));
        }

        info!("Review {id} deleted by user {user_id}");
        Ok(())
    }
}
