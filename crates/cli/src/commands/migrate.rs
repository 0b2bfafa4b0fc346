//! Database migration runner.

use secrecy::SecretString;

/// Apply all pending migrations from `crates/admin/migrations/`.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run(database_url: &SecretString) -> Result<(), Box<dyn std::error::Error>> {
    let pool = storekeep_admin::db::create_pool(database_url).await?;

    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("migrations applied");
    Ok(())
}
