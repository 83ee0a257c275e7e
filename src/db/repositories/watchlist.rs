use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::db::now_timestamp;
use crate::domain::{MovieId, UserId};
use crate::entities::{prelude::*, watchlist};
use crate::models::watchlist::WatchlistEntry;

pub struct WatchlistRepository {
    conn: DatabaseConnection,
}

impl WatchlistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: watchlist::Model) -> WatchlistEntry {
        WatchlistEntry {
            id: m.id,
            user_id: UserId::new(m.user_id),
            movie_id: MovieId::new(m.movie_id),
            added_at: m.added_at,
        }
    }

    /// Entries of one user, most recently added first.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<WatchlistEntry>> {
        let rows = Watchlist::find()
            .filter(watchlist::Column::UserId.eq(user_id.value()))
            .order_by_desc(watchlist::Column::AddedAt)
            .order_by_desc(watchlist::Column::Id)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list watchlist for user {user_id}"))?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn contains(&self, user_id: UserId, movie_id: MovieId) -> Result<bool> {
        let count = Watchlist::find()
            .filter(watchlist::Column::UserId.eq(user_id.value()))
            .filter(watchlist::Column::MovieId.eq(movie_id.value()))
            .count(&self.conn)
            .await
            .context("Failed to query watchlist entry")?;

        Ok(count > 0)
    }

    /// Adds a movie. Returns `None` when it is already on the list.
    pub async fn add(&self, user_id: UserId, movie_id: MovieId) -> Result<Option<WatchlistEntry>> {
        let active = watchlist::ActiveModel {
            user_id: Set(user_id.value()),
            movie_id: Set(movie_id.value()),
            added_at: Set(now_timestamp()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(Self::map_model(model))),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert watchlist entry"),
        }
    }

    pub async fn remove(&self, user_id: UserId, movie_id: MovieId) -> Result<bool> {
        let result = Watchlist::delete_many()
            .filter(watchlist::Column::UserId.eq(user_id.value()))
            .filter(watchlist::Column::MovieId.eq(movie_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete watchlist entry")?;

        Ok(result.rows_affected > 0)
    }
}
