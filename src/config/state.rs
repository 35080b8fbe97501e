// Application state module
// Read-only state shared by every connection after startup

use std::sync::Arc;

use super::types::Config;
use crate::storage::Storage;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Store handle; each request opens its own session from it
    pub storage: Arc<Storage>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let storage = Storage::new(config.storage.database_path());
        Self::with_storage(config, storage)
    }

    /// Build state around an explicit store, bypassing `storage.instance_dir`
    pub fn with_storage(config: &Config, storage: Storage) -> Self {
        Self {
            config: config.clone(),
            storage: Arc::new(storage),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
