//! `SeaORM` implementation of the `MovieService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::analytics::listing::{self, MovieFilter};
use crate::analytics::{self, RatedMovie};
use crate::db::Store;
use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieUpdate, NewMovie};
use crate::services::movie_service::{MovieError, MovieService};

pub struct SeaOrmMovieService {
    store: Store,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn rated_catalog(&self) -> Result<Vec<RatedMovie>, MovieError> {
        let (movies, reviews) = tokio::join!(self.store.list_movies(), self.store.list_reviews());
        Ok(analytics::summarize_by_movie(&movies?, &reviews?))
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn list(&self, filter: &MovieFilter) -> Result<Vec<RatedMovie>, MovieError> {
        let catalog = self.rated_catalog().await?;
        Ok(listing::apply(catalog, filter))
    }

    async fn genres(&self) -> Result<Vec<String>, MovieError> {
        let catalog = self.rated_catalog().await?;
        Ok(listing::distinct_genres(&catalog))
    }

    async fn get(&self, id: MovieId) -> Result<RatedMovie, MovieError> {
        let (movie, reviews) = tokio::join!(
            self.store.get_movie(id),
            self.store.list_reviews_for_movie(id)
        );

        let movie = movie?.ok_or(MovieError::NotFound(id))?;
        let summary = analytics::aggregate(&reviews?);

        Ok(RatedMovie::new(movie, summary))
    }

    async fn create(&self, movie: NewMovie) -> Result<Movie, MovieError> {
        let movie = self.store.add_movie(movie).await?;
        info!("Movie {} created: {}", movie.id, movie.title);
        Ok(movie)
    }

    async fn update(&self, id: MovieId, update: MovieUpdate) -> Result<Movie, MovieError> {
        let movie = self
            .store
            .update_movie(id, update)
            .await?
            .ok_or(MovieError::NotFound(id))?;
        info!("Movie {id} updated");
        Ok(movie)
    }

    async fn delete(&self, id: MovieId) -> Result<(), MovieError> {
        if self.store.remove_movie(id).await? {
            info!("Movie {id} deleted with its reviews and watchlist entries");
            Ok(())
        } else {
            Err(MovieError::NotFound(id))
        }
    }
}
