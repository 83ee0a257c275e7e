use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::info;

use crate::db::now_timestamp;
use crate::domain::{MovieId, ReviewId, UserId};
use crate::entities::{prelude::*, reviews};
use crate::models::review::Review;

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: ReviewId::new(model.id),
            movie_id: MovieId::new(model.movie_id),
            user_id: UserId::new(model.user_id),
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list reviews")?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Reviews of one movie, newest first.
    pub async fn list_for_movie(&self, movie_id: MovieId) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .filter(reviews::Column::MovieId.eq(movie_id.value()))
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list reviews for movie {movie_id}"))?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Reviews written by one user, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .filter(reviews::Column::UserId.eq(user_id.value()))
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list reviews for user {user_id}"))?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn get(&self, id: ReviewId) -> Result<Option<Review>> {
        let row = Reviews::find_by_id(id.value())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query review {id}"))?;

        Ok(row.map(Review::from))
    }

    pub async fn find_by_movie_and_user(
        &self,
        movie_id: MovieId,
        user_id: UserId,
    ) -> Result<Option<Review>> {
        let row = Reviews::find()
            .filter(reviews::Column::MovieId.eq(movie_id.value()))
            .filter(reviews::Column::UserId.eq(user_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query existing review")?;

        Ok(row.map(Review::from))
    }

    pub async fn count(&self) -> Result<u64> {
        Reviews::find()
            .count(&self.conn)
            .await
            .context("Failed to count reviews")
    }

    /// Inserts a review. Returns `None` when the user already reviewed the movie.
    pub async fn create(
        &self,
        movie_id: MovieId,
        user_id: UserId,
        rating: i32,
        comment: &str,
    ) -> Result<Option<Review>> {
        let now = now_timestamp();
        let active = reviews::ActiveModel {
            movie_id: Set(movie_id.value()),
            user_id: Set(user_id.value()),
            rating: Set(rating),
            comment: Set(comment.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => {
                info!(
                    "User {} reviewed movie {} ({} stars)",
                    model.user_id, model.movie_id, model.rating
                );
                Ok(Some(Review::from(model)))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert review"),
        }
    }

    pub async fn update(
        &self,
        id: ReviewId,
        rating: Option<i32>,
        comment: Option<String>,
    ) -> Result<Option<Review>> {
        let Some(existing) = Reviews::find_by_id(id.value())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query review {id} for update"))?
        else {
            return Ok(None);
        };

        let mut active: reviews::ActiveModel = existing.into();
        if let Some(rating) = rating {
            active.rating = Set(rating);
        }
        if let Some(comment) = comment {
            active.comment = Set(comment);
        }
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .with_context(|| format!("Failed to update review {id}"))?;

        Ok(Some(Review::from(model)))
    }

    pub async fn delete(&self, id: ReviewId) -> Result<bool> {
        let result = Reviews::delete_by_id(id.value())
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete review {id}"))?;

        Ok(result.rows_affected > 0)
    }
}
