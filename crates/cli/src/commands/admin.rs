//! Admin account bootstrap.
//!
//! The `/api/v1/admin/create` endpoint requires an authenticated caller, so
//! the very first account has to be created out of band.

use secrecy::SecretString;

use storekeep_admin::db::AdminRepository;
use storekeep_admin::services::auth::hash_password;
use storekeep_core::{Email, Mobile};

/// Create an admin account directly in the database.
///
/// # Errors
///
/// Returns an error if validation, hashing, or the insert fails.
pub async fn create(
    database_url: &SecretString,
    name: &str,
    password: &str,
    mobile: &str,
    email: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mobile = Mobile::parse(mobile)?;
    let email = Email::parse(email)?;
    let password_hash = hash_password(password)?;

    let pool = storekeep_admin::db::create_pool(database_url).await?;
    let id = AdminRepository::new(&pool)
        .create(name, &password_hash, &mobile, &email)
        .await?;

    tracing::info!(%id, name, "admin account created");
    Ok(())
}
