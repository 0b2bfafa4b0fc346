//! Category repository.

use sqlx::MySqlPool;

use storekeep_core::{CategoryId, CategoryStatus};

use super::RepositoryError;
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a category under `parent_id` and return its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        parent_id: CategoryId,
        name: &str,
    ) -> Result<CategoryId, RepositoryError> {
        let result = sqlx::query("INSERT INTO category (parent_id, name) VALUES (?, ?)")
            .bind(parent_id)
            .bind(name)
            .execute(self.pool)
            .await?;

        Ok(CategoryId::new(result.last_insert_id()))
    }

    /// Change a category's lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_status(
        &self,
        id: CategoryId,
        status: CategoryStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE category SET status = ? WHERE id = ? LIMIT 1")
            .bind(status.as_u8())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn rename(&self, id: CategoryId, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE category SET name = ? WHERE id = ? LIMIT 1")
            .bind(name)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List the direct children of a parent category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn children(&self, parent_id: CategoryId) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, parent_id, name, status, created_at
            FROM category
            WHERE parent_id = ?
            ORDER BY id
            ",
        )
        .bind(parent_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }
}
