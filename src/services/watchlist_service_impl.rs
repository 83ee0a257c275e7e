//! `SeaORM` implementation of the `WatchlistService` trait.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

use crate::db::Store;
use crate::domain::{MovieId, UserId};
use crate::models::movie::Movie;
use crate::models::watchlist::WatchlistItem;
use crate::services::watchlist_service::{WatchlistError, WatchlistService};

pub struct SeaOrmWatchlistService {
    store: Store,
}

impl SeaOrmWatchlistService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WatchlistService for SeaOrmWatchlistService {
    async fn list(&self, user_id: UserId) -> Result<Vec<WatchlistItem>, WatchlistError> {
        let entries = self.store.list_watchlist(user_id).await?;

        let movie_ids: Vec<MovieId> = entries.iter().map(|e| e.movie_id).collect();
        let mut movies: HashMap<MovieId, Movie> = self
            .store
            .get_movies_by_ids(&movie_ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let movie = movies.remove(&entry.movie_id)?;
                Some(WatchlistItem::new(entry, movie))
            })
            .collect())
    }

    async fn add(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<WatchlistItem, WatchlistError> {
        let movie = self
            .store
            .get_movie(movie_id)
            .await?
            .ok_or(WatchlistError::MovieNotFound(movie_id))?;

        let entry = self
            .store
            .add_to_watchlist(user_id, movie_id)
            .await?
            .ok_or(WatchlistError::AlreadyListed)?;

        info!("User {user_id} added movie {movie_id} to watchlist");
        Ok(WatchlistItem::new(entry, movie))
    }

    async fn remove(&self, user_id: UserId, movie_id: MovieId) -> Result<(), WatchlistError> {
        if self.store.remove_from_watchlist(user_id, movie_id).await? {
            info!("User {user_id} removed movie {movie_id} from watchlist");
            Ok(())
        } else {
            Err(WatchlistError::NotListed)
        }
    }

    async fn contains(&self, user_id: UserId, movie_id: MovieId) -> Result<bool, WatchlistError> {
        Ok(self.store.watchlist_contains(user_id, movie_id).await?)
    }
}
