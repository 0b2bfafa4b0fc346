//! Role repository.

use sqlx::MySqlPool;

use storekeep_core::RoleId;

use super::RepositoryError;
use crate::models::Role;

/// Repository for role database operations.
pub struct RoleRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> RoleRepository<'a> {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a role, active by default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    pub async fn create(&self, name: &str, intro: &str) -> Result<RoleId, RepositoryError> {
        let result = sqlx::query("INSERT INTO role (name, intro, active) VALUES (?, ?, TRUE)")
            .bind(name)
            .bind(intro)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "role name already exists"))?;

        Ok(RoleId::new(result.last_insert_id()))
    }

    /// Rename a role and replace its description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: RoleId,
        name: &str,
        intro: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE role SET name = ?, intro = ? WHERE id = ? LIMIT 1")
            .bind(name)
            .bind(intro)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "role name already exists"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Flip a role's active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_active(&self, id: RoleId, active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE role SET active = ? WHERE id = ? LIMIT 1")
            .bind(active)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List every role, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Role>, RepositoryError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, intro, active, created_at FROM role ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(roles)
    }

    /// Get an active role by id.
    ///
    /// Returns `None` for unknown ids and for roles that have been
    /// deactivated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(&self, id: RoleId) -> Result<Option<Role>, RepositoryError> {
        let role = sqlx::query_as::<_, Role>(
            r"
            SELECT id, name, intro, active, created_at FROM role
            WHERE id = ? AND active = TRUE
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(role)
    }
}
