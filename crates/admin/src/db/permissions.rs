//! URL permission repository.
//!
//! A permission row grants one role access to one request path. Resolution
//! queries join against `role` so deactivated roles drop out of every
//! decision without their grants being deleted.

use std::collections::HashSet;

use sqlx::MySqlPool;

use storekeep_core::RoleId;

use super::RepositoryError;
use crate::models::Permission;

/// Repository for URL permission database operations.
pub struct PermissionRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> PermissionRepository<'a> {
    /// Create a new permission repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Grant a URL to a role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the grant already exists.
    pub async fn grant(&self, url: &str, role_id: RoleId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO permission (url, role_id) VALUES (?, ?)")
            .bind(url)
            .bind(role_id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "permission already granted"))?;

        Ok(())
    }

    /// Revoke a URL from a role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such grant existed.
    pub async fn revoke(&self, url: &str, role_id: RoleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM permission WHERE role_id = ? AND url = ? LIMIT 1")
            .bind(role_id)
            .bind(url)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// The set of active roles granted a URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn roles_for_url(&self, url: &str) -> Result<HashSet<RoleId>, RepositoryError> {
        let roles = sqlx::query_scalar::<_, u64>(
            r"
            SELECT permission.role_id
            FROM permission
            INNER JOIN role ON permission.role_id = role.id
            WHERE permission.url = ? AND role.active = TRUE
            ",
        )
        .bind(url)
        .fetch_all(self.pool)
        .await?;

        Ok(roles.into_iter().map(RoleId::new).collect())
    }

    /// List every grant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Permission>, RepositoryError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT url, role_id, created_at FROM permission ORDER BY url, role_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(permissions)
    }
}
