//! Banner repository.

use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use storekeep_core::BannerId;

use super::RepositoryError;
use crate::models::Banner;

/// Repository for banner database operations.
pub struct BannerRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> BannerRepository<'a> {
    /// Create a new banner repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a banner and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or image path is
    /// already used.
    pub async fn create(
        &self,
        name: &str,
        image_path: &str,
        event: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<BannerId, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO banner (name, image_path, event, start_at, end_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(name)
        .bind(image_path)
        .bind(event)
        .bind(start_at)
        .bind(end_at)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::on_conflict(e, "banner name or image already exists"))?;

        Ok(BannerId::new(result.last_insert_id()))
    }

    /// List banners whose validity window covers `at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_valid_at(&self, at: DateTime<Utc>) -> Result<Vec<Banner>, RepositoryError> {
        let banners = sqlx::query_as::<_, Banner>(
            r"
            SELECT id, name, image_path, event, start_at, end_at
            FROM banner
            WHERE start_at <= ? AND end_at >= ?
            ORDER BY id
            ",
        )
        .bind(at)
        .bind(at)
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }

    /// Fetch a banner by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn get(&self, id: BannerId) -> Result<Banner, RepositoryError> {
        let banner = sqlx::query_as::<_, Banner>(
            r"
            SELECT id, name, image_path, event, start_at, end_at
            FROM banner
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        banner.ok_or(RepositoryError::NotFound)
    }

    /// Delete a banner by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was deleted.
    pub async fn delete(&self, id: BannerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM banner WHERE id = ? LIMIT 1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
