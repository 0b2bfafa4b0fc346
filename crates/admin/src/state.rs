//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::MySqlPool;

use crate::config::AdminConfig;
use crate::services::{JwtManager, SmsClient, UploadStore};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: MySqlPool,
    jwt: JwtManager,
    sms: SmsClient,
    store: UploadStore,
}

impl AppState {
    /// Build the state from loaded configuration and a connected pool.
    #[must_use]
    pub fn new(config: AdminConfig, pool: MySqlPool) -> Self {
        let jwt = JwtManager::new(&config.jwt);
        let sms = SmsClient::new(reqwest::Client::new(), &config.sms);
        let store = UploadStore::new(&config.upload);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                jwt,
                sms,
                store,
            }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The database pool.
    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.inner.pool
    }

    /// The token manager.
    #[must_use]
    pub fn jwt(&self) -> &JwtManager {
        &self.inner.jwt
    }

    /// The SMS gateway client.
    #[must_use]
    pub fn sms(&self) -> &SmsClient {
        &self.inner.sms
    }

    /// The upload store.
    #[must_use]
    pub fn store(&self) -> &UploadStore {
        &self.inner.store
    }
}
