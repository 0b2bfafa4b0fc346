//! Database operations for the admin MySQL schema.
//!
//! # Tables
//!
//! - `admin_user` - Admin accounts and credentials
//! - `role` / `permission` / `relation` - RBAC entities
//! - `orders` / `order_item` - Order headers and line items
//! - `banner` / `category` - Content entities
//! - `sms_code` - Pending SMS verification codes
//! - `upload_file` - Content-hash-addressed upload records
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p storekeep-cli -- migrate
//! ```

pub mod admins;
pub mod banners;
pub mod categories;
pub mod orders;
pub mod permissions;
pub mod relations;
pub mod roles;
pub mod sms;
pub mod uploads;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use thiserror::Error;

pub use admins::AdminRepository;
pub use banners::BannerRepository;
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use permissions::PermissionRepository;
pub use relations::RelationRepository;
pub use roles::RoleRepository;
pub use sms::SmsRepository;
pub use uploads::UploadRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found (or an update affected no rows).
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Translate a sqlx error, turning unique-key violations into
    /// [`RepositoryError::Conflict`] with the given message.
    pub(crate) fn on_conflict(err: sqlx::Error, msg: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(msg.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a MySQL connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - MySQL connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
