use serde::Serialize;

use crate::domain::{MovieId, UserId};
use crate::models::movie::Movie;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub id: i32,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub added_at: String,
}

/// A watchlist entry with the full movie embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: i32,
    pub user_id: UserId,
    pub movie: Movie,
    pub added_at: String,
}

impl WatchlistItem {
    #[must_use]
    pub fn new(entry: WatchlistEntry, movie: Movie) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            movie,
            added_at: entry.added_at,
        }
    }
}
