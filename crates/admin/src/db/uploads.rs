//! Upload record repository.
//!
//! Files are addressed by their content hash: an existing hash means the
//! bytes are already on disk and the stored path is returned instead of
//! writing a duplicate.

use sqlx::MySqlPool;

use storekeep_core::AdminId;

use super::RepositoryError;

/// Repository for uploaded file records.
pub struct UploadRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> UploadRepository<'a> {
    /// Create a new upload repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Record a stored file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the hash is already recorded.
    pub async fn insert(
        &self,
        user_id: AdminId,
        hash: &str,
        path: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO upload_file (hash, user_id, path) VALUES (?, ?, ?)")
            .bind(hash)
            .bind(user_id)
            .bind(path)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "file already recorded"))?;

        Ok(())
    }

    /// The stored path for a content hash, if the file is known.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn path_by_hash(&self, hash: &str) -> Result<Option<String>, RepositoryError> {
        let path = sqlx::query_scalar::<_, String>(
            "SELECT path FROM upload_file WHERE hash = ? LOCK IN SHARE MODE",
        )
        .bind(hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(path)
    }
}
