//! Admin/role relation repository.
//!
//! A relation row assigns one role to one admin. As with permissions, the
//! resolution query joins against `role` so deactivated roles disappear from
//! authorization decisions while the assignment rows survive.

use std::collections::HashSet;

use sqlx::MySqlPool;

use storekeep_core::{AdminId, RoleId};

use super::RepositoryError;
use crate::models::Relation;

/// Repository for admin/role relation database operations.
pub struct RelationRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> RelationRepository<'a> {
    /// Create a new relation repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Assign a role to an admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the assignment already exists.
    pub async fn assign(&self, admin_id: AdminId, role_id: RoleId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO relation (admin_id, role_id) VALUES (?, ?)")
            .bind(admin_id)
            .bind(role_id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "role already assigned"))?;

        Ok(())
    }

    /// Remove a role from an admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such assignment existed.
    pub async fn remove(&self, admin_id: AdminId, role_id: RoleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM relation WHERE admin_id = ? AND role_id = ? LIMIT 1")
            .bind(admin_id)
            .bind(role_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// The set of active roles assigned to an admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn roles_for_admin(
        &self,
        admin_id: AdminId,
    ) -> Result<HashSet<RoleId>, RepositoryError> {
        let roles = sqlx::query_scalar::<_, u64>(
            r"
            SELECT relation.role_id
            FROM relation
            INNER JOIN role ON relation.role_id = role.id
            WHERE relation.admin_id = ? AND role.active = TRUE
            ",
        )
        .bind(admin_id)
        .fetch_all(self.pool)
        .await?;

        Ok(roles.into_iter().map(RoleId::new).collect())
    }

    /// List an admin's assignments (active roles only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_admin(
        &self,
        admin_id: AdminId,
    ) -> Result<Vec<Relation>, RepositoryError> {
        let relations = sqlx::query_as::<_, Relation>(
            r"
            SELECT relation.admin_id, relation.role_id
            FROM relation
            INNER JOIN role ON relation.role_id = role.id
            WHERE relation.admin_id = ? AND role.active = TRUE
            ORDER BY relation.role_id
            ",
        )
        .bind(admin_id)
        .fetch_all(self.pool)
        .await?;

        Ok(relations)
    }
}
