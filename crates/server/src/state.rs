//! Application state shared across handlers.

use armoire_core::config::AppConfig;
use armoire_sync::SyncService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The reconciliation engine.
    pub sync: Arc<SyncService>,
}

impl AppState {
    pub fn new(config: AppConfig, sync: SyncService) -> Self {
        Self {
            config: Arc::new(config),
            sync: Arc::new(sync),
        }
    }
}
