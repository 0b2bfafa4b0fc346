//! Integration tests for Storekeep.
//!
//! # Running Tests
//!
//! The suites talk to a live server and database and are `#[ignore]`d by
//! default:
//!
//! ```bash
//! # Terminal 1: database + migrations + server
//! sk-cli migrate
//! cargo run -p storekeep-admin
//!
//! # Terminal 2
//! STOREKEEP_TEST_DATABASE_URL=mysql://root@localhost/storekeep \
//!   cargo test -p storekeep-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use sqlx::MySqlPool;

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("STOREKEEP_TEST_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8080".to_owned())
}

/// Database URL the tests may write through directly.
///
/// # Panics
///
/// Panics if `STOREKEEP_TEST_DATABASE_URL` is not set; the suites that need
/// it are `#[ignore]`d, so this only fires when they are run deliberately.
#[must_use]
pub fn test_database_url() -> SecretString {
    SecretString::from(
        std::env::var("STOREKEEP_TEST_DATABASE_URL")
            .expect("STOREKEEP_TEST_DATABASE_URL must be set for integration tests"),
    )
}

/// Connect a pool to the test database.
///
/// # Panics
///
/// Panics if the connection fails; these tests require a live database.
pub async fn connect() -> MySqlPool {
    storekeep_admin::db::create_pool(&test_database_url())
        .await
        .expect("failed to connect to the test database")
}

/// A unique suffix for test fixtures so reruns do not collide.
#[must_use]
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_owned()
}
