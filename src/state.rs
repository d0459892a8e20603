use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::fundmeta::Core;

/// The shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Pool used by the readiness probe and by the store.
    pub db: sqlx::SqlitePool,
    pub config: Arc<AppConfig>,
    /// Mutual fund metadata operations.
    pub fund_meta: Core,
}

impl AppState {
    /// Creates the state. The write lock is created here, once per process,
    /// and handed to the store.
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        let lock = Arc::new(RwLock::new(()));
        Self { fund_meta: Core::new(db.clone(), lock), db, config: Arc::new(config) }
    }
}
