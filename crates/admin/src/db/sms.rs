//! SMS verification-code repository.
//!
//! Rows are keyed by the opaque `sign` correlation token a client sends with
//! both the issue and the check request; a row lives from send until a
//! successful check deletes it.

use sqlx::MySqlPool;

use storekeep_core::Mobile;

use super::RepositoryError;

/// Repository for pending SMS verification codes.
pub struct SmsRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> SmsRepository<'a> {
    /// Create a new SMS repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Record a freshly issued code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the mobile or sign already has
    /// a pending code.
    pub async fn insert(
        &self,
        mobile: &Mobile,
        sent_at: i64,
        code: &str,
        sign: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO sms_code (mobile, sent_at, code, sign) VALUES (?, ?, ?, ?)")
            .bind(mobile)
            .bind(sent_at)
            .bind(code)
            .bind(sign)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::on_conflict(e, "a code is already pending"))?;

        Ok(())
    }

    /// The unix time the pending code for `sign` was sent, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sent_at_by_sign(&self, sign: &str) -> Result<Option<i64>, RepositoryError> {
        let sent_at =
            sqlx::query_scalar::<_, i64>("SELECT sent_at FROM sms_code WHERE sign = ?")
                .bind(sign)
                .fetch_optional(self.pool)
                .await?;

        Ok(sent_at)
    }

    /// The pending code for `sign`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn code_by_sign(&self, sign: &str) -> Result<Option<String>, RepositoryError> {
        let code = sqlx::query_scalar::<_, String>("SELECT code FROM sms_code WHERE sign = ?")
            .bind(sign)
            .fetch_optional(self.pool)
            .await?;

        Ok(code)
    }

    /// Drop the pending code for `sign`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_sign(&self, sign: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sms_code WHERE sign = ? LIMIT 1")
            .bind(sign)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
