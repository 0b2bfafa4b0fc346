//! Admin account repository.
//!
//! Credential reads keep the `LOCK IN SHARE MODE` hint the schema has always
//! used for login-path queries.

use sqlx::MySqlPool;

use storekeep_core::{AdminId, Email, Mobile};

use super::RepositoryError;

/// Repository for admin account database operations.
pub struct AdminRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a new admin account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name, mobile, or email is
    /// already taken. Returns `RepositoryError::Database` for other errors.
    pub async fn create(
        &self,
        name: &str,
        password_hash: &str,
        mobile: &Mobile,
        email: &Email,
    ) -> Result<AdminId, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO admin_user (name, password_hash, mobile, email, active)
            VALUES (?, ?, ?, ?, TRUE)
            ",
        )
        .bind(name)
        .bind(password_hash)
        .bind(mobile)
        .bind(email)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::on_conflict(e, "name, mobile or email already exists"))?;

        Ok(AdminId::new(result.last_insert_id()))
    }

    /// Look up the id and password hash for an active account by name.
    ///
    /// Returns `None` for unknown names and for deactivated accounts, so the
    /// login path cannot distinguish the two.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn credentials_for_login(
        &self,
        name: &str,
    ) -> Result<Option<(AdminId, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, (u64, String)>(
            r"
            SELECT id, password_hash FROM admin_user
            WHERE name = ? AND active = TRUE
            LOCK IN SHARE MODE
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, hash)| (AdminId::new(id), hash)))
    }

    /// Fetch the stored password hash of an active account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist or
    /// is inactive. Returns `RepositoryError::Database` for other errors.
    pub async fn password_hash(&self, id: AdminId) -> Result<String, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM admin_user
            WHERE id = ? AND active = TRUE
            LOCK IN SHARE MODE
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        hash.ok_or(RepositoryError::NotFound)
    }

    /// Update an account's email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub async fn set_email(&self, id: AdminId, email: &Email) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_user SET email = ? WHERE id = ? LIMIT 1")
            .bind(email)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "email already exists"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Update an account's mobile number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    /// Returns `RepositoryError::Conflict` if the mobile is already taken.
    pub async fn set_mobile(&self, id: AdminId, mobile: &Mobile) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_user SET mobile = ? WHERE id = ? LIMIT 1")
            .bind(mobile)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "mobile already exists"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_password_hash(
        &self,
        id: AdminId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_user SET password_hash = ? WHERE id = ? LIMIT 1")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Flip an account's active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row was updated.
    pub async fn set_active(&self, id: AdminId, active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_user SET active = ? WHERE id = ? LIMIT 1")
            .bind(active)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Check whether an account is active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn is_active(&self, id: AdminId) -> Result<bool, RepositoryError> {
        let active = sqlx::query_scalar::<_, bool>(
            "SELECT active FROM admin_user WHERE id = ? LOCK IN SHARE MODE",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        active.ok_or(RepositoryError::NotFound)
    }
}
