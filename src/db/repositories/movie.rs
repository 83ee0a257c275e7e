use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::db::now_timestamp;
use crate::domain::MovieId;
use crate::entities::{movies, prelude::*, reviews, watchlist};
use crate::models::movie::{Movie, MovieUpdate, NewMovie};

impl From<movies::Model> for Movie {
    fn from(model: movies::Model) -> Self {
        Self {
            id: MovieId::new(model.id),
            title: model.title,
            description: model.description,
            genre: model.genre,
            director: model.director,
            release_date: model.release_date,
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All movies, newest first.
    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_desc(movies::Column::CreatedAt)
            .order_by_desc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn get(&self, id: MovieId) -> Result<Option<Movie>> {
        let row = Movies::find_by_id(id.value())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query movie {id}"))?;

        Ok(row.map(Movie::from))
    }

    pub async fn get_by_ids(&self, ids: &[MovieId]) -> Result<Vec<Movie>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Movies::find()
            .filter(movies::Column::Id.is_in(ids.iter().map(|id| id.value())))
            .all(&self.conn)
            .await
            .context("Failed to query movies by IDs")?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn exists(&self, id: MovieId) -> Result<bool> {
        let count = Movies::find_by_id(id.value())
            .count(&self.conn)
            .await
            .context("Failed to check movie existence")?;

        Ok(count > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Movies::find()
            .count(&self.conn)
            .await
            .context("Failed to count movies")
    }

    pub async fn create(&self, movie: NewMovie) -> Result<Movie> {
        let now = now_timestamp();
        let active = movies::ActiveModel {
            title: Set(movie.title),
            description: Set(movie.description),
            genre: Set(Some(movie.genre)),
            director: Set(movie.director),
            release_date: Set(movie.release_date),
            image_url: Set(movie.image_url),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert movie")?;

        info!("Added movie {}: {}", model.id, model.title);
        Ok(Movie::from(model))
    }

    /// Applies the present fields of `update`. Returns `None` for an unknown id.
    pub async fn update(&self, id: MovieId, update: MovieUpdate) -> Result<Option<Movie>> {
        let Some(existing) = Movies::find_by_id(id.value())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query movie {id} for update"))?
        else {
            return Ok(None);
        };

        let mut active: movies::ActiveModel = existing.into();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(genre) = update.genre {
            active.genre = Set(Some(genre));
        }
        if let Some(director) = update.director {
            active.director = Set(director);
        }
        if let Some(release_date) = update.release_date {
            active.release_date = Set(release_date);
        }
        if let Some(image_url) = update.image_url {
            active.image_url = Set(Some(image_url).filter(|url| !url.is_empty()));
        }
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .with_context(|| format!("Failed to update movie {id}"))?;

        Ok(Some(Movie::from(model)))
    }

    /// Deletes a movie together with its reviews and watchlist entries.
    pub async fn delete(&self, id: MovieId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        Reviews::delete_many()
            .filter(reviews::Column::MovieId.eq(id.value()))
            .exec(&txn)
            .await
            .context("Failed to delete reviews of movie")?;

        Watchlist::delete_many()
            .filter(watchlist::Column::MovieId.eq(id.value()))
            .exec(&txn)
            .await
            .context("Failed to delete watchlist entries of movie")?;

        let result = Movies::delete_by_id(id.value())
            .exec(&txn)
            .await
            .context("Failed to delete movie")?;

        txn.commit().await?;

        if result.rows_affected > 0 {
            info!("Removed movie {id}");
        }
        Ok(result.rows_affected > 0)
    }
}
